use sea_orm::entity::prelude::*;

/// Represents one account of the scontrini administrative backend.
///
/// Credentials live in `password_hash`; the hash and the legacy `salt`
/// column must never leave the store layer (see the response shaping in the
/// HTTP crate).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "utenti")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// Bcrypt digest of the password.
    pub password_hash: String,
    /// Legacy column kept for schema compatibility. Bcrypt embeds its own
    /// salt, so this is always the empty string.
    pub salt: String,
    pub nome: Option<String>,
    pub cognome: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    #[sea_orm(default_value = "user")]
    pub ruolo: String,
    /// Issuing entity this account belongs to, if any.
    pub emittente_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user may be attached to at most one issuing entity.
    #[sea_orm(
        belongs_to = "super::emittente::Entity",
        from = "Column::EmittenteId",
        to = "super::emittente::Column::Id"
    )]
    Emittente,
}

impl Related<super::emittente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Emittente.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
