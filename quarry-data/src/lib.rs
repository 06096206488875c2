pub mod driver;
pub mod entity;
pub mod error;
pub mod page;
pub mod query;
pub mod read;
pub mod repository;
pub mod resolver;
pub mod tx;
pub mod write;

pub use driver::StorageDriver;
pub use entity::Entity;
pub use error::DataError;
pub use page::Page;
pub use query::{Clause, FieldValues, Logic, Predicate, Query, Sort, SortOrder};
pub use read::ReadRepository;
pub use repository::Repository;
pub use tx::{Transaction, TxScope};
pub use write::WriteRepository;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        DataError, Entity, FieldValues, Page, Predicate, Query, ReadRepository, Repository,
        SortOrder, StorageDriver, Transaction, TxScope, WriteRepository,
    };
}
