use clap::Subcommand;
use myhabits_core::session::{LoginForm, RegistrationForm};
use myhabits_core::{AuthOutcome, Session};

use crate::common::{print_json, Context};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and log in
    Register {
        username: String,
        email: String,
        password: String,
        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Log in with email and password
    Login { email: String, password: String },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
}

pub fn run(
    ctx: &Context,
    session: Session,
    action: AuthAction,
) -> Result<Session, Box<dyn std::error::Error>> {
    let gate = ctx.gate();

    match action {
        AuthAction::Register {
            username,
            email,
            password,
            confirm,
        } => {
            let form = RegistrationForm {
                username,
                email,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                password,
            };
            form.validate()?;
            settle(gate.register(session, form.into_user())?)
        }
        AuthAction::Login { email, password } => {
            let form = LoginForm { email, password };
            form.validate()?;
            settle(gate.login(session, &form.email, &form.password)?)
        }
        AuthAction::Logout => {
            let was_logged_in = session.is_logged_in();
            let session = gate.logout(session)?;
            if was_logged_in {
                println!("logged out");
            } else {
                println!("not logged in");
            }
            Ok(session)
        }
        AuthAction::Whoami => {
            match session.user() {
                Some(user) => println!("{} <{}>", user.username, user.email),
                None => println!("not logged in"),
            }
            Ok(session)
        }
    }
}

/// Print an accepted session's user, or turn a rejection into an error.
fn settle(outcome: AuthOutcome) -> Result<Session, Box<dyn std::error::Error>> {
    match outcome {
        AuthOutcome::Accepted(session) => {
            if let Some(user) = session.user() {
                println!("Logged in: {}", user.id);
                print_json(&serde_json::json!({
                    "id": user.id,
                    "username": user.username,
                    "email": user.email,
                }))?;
            }
            Ok(session)
        }
        AuthOutcome::Rejected { reason, .. } => Err(reason.to_string().into()),
    }
}
