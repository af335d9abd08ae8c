use super::ui;
use crate::auth::AuthService;
use anyhow::Result;

pub async fn run_signup(
    auth: &AuthService,
    user_name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let spinner = ui::new_spinner("Creating account...");
    let result = auth.sign_up(user_name, email, password).await;
    spinner.finish_and_clear();
    result?;

    println!(
        "{} You can login now with {}.",
        ui::style_text("Account created.", ui::StyleType::TotalValue),
        ui::style_text("fxlog login", ui::StyleType::TotalLabel)
    );
    Ok(())
}

pub async fn run_login(auth: &AuthService, email: &str, password: &str) -> Result<()> {
    let spinner = ui::new_spinner("Signing in...");
    let result = auth.sign_in(email, password).await;
    spinner.finish_and_clear();
    let session = result?;

    println!(
        "{} Signed in as {}.",
        ui::style_text("Login successful!", ui::StyleType::TotalValue),
        ui::style_text(&session.email, ui::StyleType::TotalLabel)
    );
    Ok(())
}

pub fn run_logout(auth: &AuthService) -> Result<()> {
    auth.sign_out()?;
    println!("Signed out.");
    Ok(())
}
