mod bundle;
mod pair;
mod sync_event;
mod token;

pub use bundle::Bundle;
pub use pair::{Pair, TokenSide};
pub use sync_event::SyncEvent;
pub use token::Token;
