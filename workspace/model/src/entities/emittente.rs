use sea_orm::entity::prelude::*;

/// An issuing entity (business location) and its thermal-printer endpoint.
///
/// Rows are provisioned out-of-band (seed SQL or operator tooling); the HTTP
/// layer only reads them for the printer reachability check.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "emittenti")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Hostname or address of the receipt printer, if one is configured.
    pub printer_host: Option<String>,
    /// TCP port of the printer; 9100 is assumed when unset.
    pub printer_port: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An issuing entity can have multiple user accounts.
    #[sea_orm(has_many = "super::utente::Entity")]
    Utente,
}

impl Related<super::utente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Utente.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
