/// Recognized failure outcomes of a `/c` invocation.
///
/// None of these are crashes; the orchestrator turns each one into a
/// user-facing reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillError {
    /// The command was sent with no arguments at all.
    #[error("no arguments supplied")]
    NoArguments,
    /// A bank key was given but account or amount is missing.
    #[error("explicit bank form needs bank, account and amount")]
    IncompleteBankForm,
    /// Amount or people count is not a positive integer.
    #[error("amount and people count must be positive integers")]
    InvalidAmount,
    #[error("unknown bank: {0}")]
    UnknownBank(String),
}

impl BillError {
    /// Usage errors are answered with guidance on how to call the command.
    pub fn is_usage(&self) -> bool {
        matches!(self, BillError::NoArguments | BillError::IncompleteBankForm)
    }
}
