mod settings;
mod story;

pub use settings::{
    GenerationConfig, Genre, PAGE_COUNT_RANGE, PANELS_PER_PAGE_RANGE, Tone, TwistIntensity,
};
pub use story::{Character, Page, Panel, PanelKey, PanelStatus, PanelUpdate, Story};

#[cfg(test)]
pub(crate) use story::fixtures;
