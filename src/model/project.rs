use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Project row. The descriptive columns are loosely populated: depending on how
/// a project was imported, the code lives in `code` or `codigo` and the long
/// name in `nombre` or `description`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub company_id: Option<u64>,
    pub code: Option<String>,
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub description: Option<String>,
}

impl Project {
    /// Project code: `code`, then `codigo`, else `""`.
    pub fn resolved_code(&self) -> &str {
        first_filled(&[self.code.as_deref(), self.codigo.as_deref()])
    }

    /// Long name: `nombre`, then `description`, else `""`.
    pub fn resolved_nombre(&self) -> &str {
        first_filled(&[self.nombre.as_deref(), self.description.as_deref()])
    }
}

/// Returns the first candidate that is present and non-empty, in priority order.
pub fn first_filled<'a>(candidates: &[Option<&'a str>]) -> &'a str {
    candidates
        .iter()
        .flatten()
        .find(|value| !value.is_empty())
        .copied()
        .unwrap_or("")
}
