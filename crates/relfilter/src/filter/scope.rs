use crate::filter::StrategyMode;

///
/// CompileScope
///
/// Mode snapshot for one compilation call. Resolved once at the root and
/// passed by value to every hop, so nested hops can never disagree with
/// the root or observe a model-level change made mid-call.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CompileScope {
    mode: StrategyMode,
}

impl CompileScope {
    #[must_use]
    pub const fn new(mode: StrategyMode) -> Self {
        Self { mode }
    }

    /// Precedence: call override, then builder override, then the model
    /// default, then `Exists`.
    #[must_use]
    pub fn resolve(
        call: Option<StrategyMode>,
        builder: Option<StrategyMode>,
        model: Option<StrategyMode>,
    ) -> Self {
        Self::new(call.or(builder).or(model).unwrap_or_default())
    }

    #[must_use]
    pub const fn mode(self) -> StrategyMode {
        self.mode
    }
}
