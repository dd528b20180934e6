//! This file serves as the root for all SeaORM entity modules.
//! The scontrini backend persists two tables: user accounts (`utenti`) and
//! issuing entities (`emittenti`), the business locations a user and a
//! receipt printer belong to.

pub mod emittente;
pub mod utente;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::emittente::Entity as Emittente;
    pub use super::utente::Entity as Utente;
}
