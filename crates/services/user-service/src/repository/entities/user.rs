//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Gender, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub age: i32,
    #[sea_orm(unique)]
    pub email: String,
    /// "Male" or "Female"
    pub gender: String,
    pub date_of_birth: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            name: model.name,
            age: model.age,
            email: model.email,
            gender: Gender::from(model.gender),
            date_of_birth: model.date_of_birth,
        }
    }
}

/// Full insert model for a domain user
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        ActiveModel {
            id: Set(user.id),
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            name: Set(user.name),
            age: Set(user.age),
            email: Set(user.email),
            gender: Set(user.gender.to_string()),
            date_of_birth: Set(user.date_of_birth),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_model_into_user_maps_gender() {
        let model = Model {
            id: Uuid::new_v4(),
            username: "johndoe1".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            name: "John Doe".to_string(),
            age: 25,
            email: "john@example.com".to_string(),
            gender: "Female".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1998, 1, 1).unwrap(),
        };

        let user = User::from(model.clone());
        assert_eq!(user.id, model.id);
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.password_hash, "$argon2id$hash");
    }

    #[test]
    fn test_unknown_stored_gender_is_undefined() {
        let model = Model {
            id: Uuid::new_v4(),
            username: "johndoe1".to_string(),
            password_hash: String::new(),
            name: "John Doe".to_string(),
            age: 25,
            email: "john@example.com".to_string(),
            gender: "other".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1998, 1, 1).unwrap(),
        };

        assert_eq!(User::from(model).gender, Gender::Undefined);
    }
}
