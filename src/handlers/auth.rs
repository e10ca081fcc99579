// src/handlers/auth.rs

use axum::Json;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::{auth::CurrentUser, rbac::MenuEntry},
};

// Handler da rota protegida /me
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<CurrentUser> {
    Json(user)
}

// Seções do console liberadas para o papel do usuário
pub async fn get_my_menu(AuthenticatedUser(user): AuthenticatedUser) -> Json<&'static [MenuEntry]> {
    Json(user.role.menu())
}
