use quarry_data::Entity;
use quarry_data_memory::MemoryDriver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub city: String,
}

impl Entity for User {
    type Id = i64;

    fn table_name() -> &'static str {
        "users"
    }

    fn id_field() -> &'static str {
        "id"
    }

    fn fields() -> &'static [&'static str] {
        &["id", "name", "age", "city"]
    }

    fn id(&self) -> &i64 {
        &self.id
    }
}

pub fn user(id: i64, name: &str, age: i64, city: &str) -> User {
    User {
        id,
        name: name.to_string(),
        age,
        city: city.to_string(),
    }
}

/// Driver preloaded with a small fixed population.
pub async fn seeded_driver() -> MemoryDriver<User> {
    use quarry_data::{StorageDriver, TxScope};

    let driver = MemoryDriver::new();
    let users = [
        user(1, "Ann", 30, "Oslo"),
        user(2, "Bob", 25, "Lima"),
        user(3, "Cleo", 30, "Oslo"),
        user(4, "Dan", 41, "Kyiv"),
        user(5, "Eve", 25, "Lima"),
    ];
    driver
        .save_all(&users, TxScope::Auto)
        .await
        .expect("seeding the in-memory driver cannot fail");
    driver
}
