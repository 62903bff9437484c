pub mod builders;
pub mod db;

pub use builders::{semillero, SessionBuilder, UserBuilder};
pub use db::TestStore;
