pub mod admin;
pub mod buy_ticket;
pub mod claim_prize;
pub mod close_round;
pub mod reveal_winning_numbers;
pub mod views;

pub use admin::*;
pub use buy_ticket::*;
pub use claim_prize::*;
pub use close_round::*;
pub use reveal_winning_numbers::*;
pub use views::*;
