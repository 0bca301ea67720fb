pub mod initialize_mint;
pub mod mint_token;
pub mod transfer_token;

pub use initialize_mint::*;
pub use mint_token::*;
pub use transfer_token::*;
