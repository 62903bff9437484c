pub mod collection;

pub use collection::Entity as Collection;
