use super::log_decision;
use maumau_core::strategy::{Choice, Strategy, TableView};
use rand::RngCore;

/// Never plays; every turn is a forced draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDrawAi;

impl Strategy for AlwaysDrawAi {
    fn name(&self) -> &str {
        "always_draw"
    }

    fn choose(&self, view: &TableView<'_>, _rng: &mut dyn RngCore) -> Option<Choice> {
        log_decision(self.name(), view, None, "always_draw");
        None
    }
}
