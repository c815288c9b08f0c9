use std::fmt;

use serde::{Deserialize, Serialize};

/// Rol del usuario. Conjunto cerrado: añadir una variante obliga a tratarla
/// en cada `match` (guardia, resolutor, menú).
///
/// En el cable el backend usa `ADMIN` / `GESTIONNAIRE` / `TECHNICIEN`; al
/// decodificar también se aceptan `MANAGER` / `TECHNICIAN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "GESTIONNAIRE", alias = "MANAGER")]
    Manager,
    #[serde(rename = "TECHNICIEN", alias = "TECHNICIAN")]
    Technician,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Technician];

    /// Nombre canónico (independiente del backend)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Technician => "TECHNICIAN",
        }
    }

    /// Puede crear cuentas (`POST /auth/register`)
    pub fn can_register_users(&self) -> bool {
        match self {
            Role::Admin | Role::Manager => true,
            Role::Technician => false,
        }
    }

    /// Puede aprobar o rechazar sitios pendientes
    pub fn can_validate_sites(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Puede arrancar/parar monitorización y simulación, y limpiar exportaciones
    pub fn can_control_services(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Recibe los avisos de `/notifications`
    pub fn can_read_notifications(&self) -> bool {
        matches!(self, Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usuario autenticado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "username")]
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Sede a la que pertenece el usuario (`siege` en el backend)
    #[serde(alias = "siege", default)]
    pub organization_unit: String,
}

/// Token bearer opaco. `Debug` no muestra el valor.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Valor de la cabecera `Authorization`
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: Credential,
    pub user: Identity,
}

/// Alta de usuario (solo ADMIN y GESTIONNAIRE)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(rename = "siege")]
    pub organization_unit: String,
}
