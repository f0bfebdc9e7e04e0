//! Middleware de autenticación JWT
//!
//! La identidad la emite un proveedor externo; aquí solo se valida la
//! firma del token y se confía en el principal (id + rol) que trae.
//! Las comprobaciones de autorización se expresan una sola vez como
//! capacidades (`Capability`) en lugar de comparaciones de rol ad hoc.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rol del principal autenticado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Admin,
}

/// Claims del JWT emitido por el proveedor de identidad
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Capacidad requerida por una operación
#[derive(Debug, Clone, Copy)]
pub enum Capability {
    /// El recurso pertenece a este usuario
    Owner(Uuid),
    /// Operación reservada a administradores
    Admin,
}

impl AuthenticatedUser {
    /// Verificar que el principal tiene la capacidad pedida.
    /// Un administrador satisface también la capacidad de propietario.
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        match capability {
            Capability::Admin => {
                if self.role == UserRole::Admin {
                    Ok(())
                } else {
                    Err(AppError::Forbidden(
                        "Administrator access required".to_string(),
                    ))
                }
            }
            Capability::Owner(owner_id) => {
                if self.user_id == owner_id || self.role == UserRole::Admin {
                    Ok(())
                } else {
                    Err(AppError::Forbidden(
                        "You do not have access to this resource".to_string(),
                    ))
                }
            }
        }
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    // Decodificar y validar JWT
    let token_data = decode::<Claims>(
        auth_header,
        &DecodingKey::from_secret(state.config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    let claims = token_data.claims;

    let authenticated_user = AuthenticatedUser {
        user_id: Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?,
        role: claims.role,
    };

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_owner_can_access_own_resource() {
        let u = user(UserRole::User);
        assert!(u.require(Capability::Owner(u.user_id)).is_ok());
    }

    #[test]
    fn test_user_cannot_access_foreign_resource() {
        let u = user(UserRole::User);
        assert!(matches!(
            u.require(Capability::Owner(Uuid::new_v4())),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_satisfies_owner_capability() {
        let u = user(UserRole::Admin);
        assert!(u.require(Capability::Owner(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn test_user_is_not_admin() {
        let u = user(UserRole::User);
        assert!(matches!(
            u.require(Capability::Admin),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_capability_for_admin() {
        let u = user(UserRole::Admin);
        assert!(u.require(Capability::Admin).is_ok());
    }
}
