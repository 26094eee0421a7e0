use serde::Serialize;
use tracing::info;

use perpus_core::{Credentials, ProfileUpdate, Registration, RouteName, User};

use super::navigate::{self, Transition};
use crate::output::{user_line, Output};
use crate::state::AppContext;

/// Result of a sign-in, as printed.
#[derive(Debug, Serialize)]
struct SignedIn {
    user: Option<User>,
    landed: Transition,
}

fn describe_sign_in(signed_in: &SignedIn) -> String {
    let who = signed_in
        .user
        .as_ref()
        .map(user_line)
        .unwrap_or_else(|| "unknown user".to_string());
    format!("Signed in as {}\n-> {}", who, navigate::describe(&signed_in.landed))
}

pub async fn login(
    ctx: &AppContext,
    out: Output,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let session = ctx.session.login(&Credentials { email, password }).await?;
    let landed = navigate::leave_login(ctx).await?;

    out.emit(
        &SignedIn {
            user: session.user().cloned(),
            landed,
        },
        describe_sign_in,
    )
}

pub async fn register(
    ctx: &AppContext,
    out: Output,
    name: String,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let registration = Registration {
        name,
        email,
        password,
    };
    let session = ctx.session.register(&registration).await?;
    let landed = navigate::leave_login(ctx).await?;

    out.emit(
        &SignedIn {
            user: session.user().cloned(),
            landed,
        },
        describe_sign_in,
    )
}

pub async fn logout(ctx: &AppContext, out: Output) -> anyhow::Result<()> {
    ctx.session.logout().await?;
    ctx.save_route(&RouteName::Login.location());
    info!("Session cleared");

    out.emit(&serde_json::json!({ "logged_out": true }), |_| {
        "Logged out".to_string()
    })
}

pub async fn whoami(ctx: &AppContext, out: Output, refresh: bool) -> anyhow::Result<()> {
    let user = if refresh {
        ctx.session.refresh_identity().await?.user().cloned()
    } else {
        ctx.session.user().await
    };

    out.emit(&user, |user| match user {
        Some(user) => user_line(user),
        None => "Not signed in".to_string(),
    })
}

pub async fn profile(
    ctx: &AppContext,
    out: Output,
    name: Option<String>,
    email: Option<String>,
    age: Option<u32>,
    bio: Option<String>,
) -> anyhow::Result<()> {
    let update = ProfileUpdate {
        name,
        email,
        age,
        bio,
    };
    let session = ctx.session.update_profile(&update).await?;

    out.emit(&session.user().cloned(), |user| match user {
        Some(user) => format!("Profile updated: {}", user_line(user)),
        None => "Profile updated".to_string(),
    })
}
