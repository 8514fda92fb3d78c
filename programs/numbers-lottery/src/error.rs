use anchor_lang::prelude::*;

#[error_code]
pub enum LotteryError {
    #[msg("Invalid ticket count, number selection or payment")]
    InvalidInput,
    #[msg("The round is not ready to close")]
    NotReady,
    #[msg("Randomness has already been requested for this round")]
    AlreadyClosing,
    #[msg("No outstanding randomness request matches this handle")]
    UnknownRequest,
    #[msg("The randomness request has already been fulfilled")]
    AlreadyFulfilled,
    #[msg("Ticket or round not found")]
    NotFound,
    #[msg("Empty Lottery")]
    EmptyRound,
    #[msg("This lottery has not been created yet")]
    RoundNotCreated,
    #[msg("Ticket prize should be claimed by the owner of the ticket")]
    Unauthorized,
    #[msg("The lottery results have not been announced.")]
    ResultsNotAnnounced,
    #[msg("Ticket has already been redeemed")]
    AlreadyClaimed,
    #[msg("The ticket does not match any winning number")]
    NoWinningMatch,
    #[msg("The prize pool cannot cover this payout")]
    InsufficientFunds,
    #[msg("Invalid lottery configuration")]
    InvalidConfig,
    #[msg("The supplied round is not the one this operation targets")]
    WrongRound,
    #[msg("Randomness already revealed")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness not resolved")]
    RandomnessNotResolved,
    #[msg("Incorrect randomness account")]
    InvalidRandomnessAccount,
    #[msg("Arithmetic overflow")]
    MathOverflow,
}
