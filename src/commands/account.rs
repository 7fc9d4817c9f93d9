use chatgrid::errors::AppError;
use chatgrid::models::UserProfile;

use super::App;

fn print_profile(user: &UserProfile) {
    let tier = if user.is_premium { "Expert" } else { "Free" };
    println!("{} <{}>", user.full_name, user.email);
    println!("Tier: {tier} · Credits: {}", user.credits);
}

pub async fn login(app: &App, email: &str, password: &str) -> Result<(), AppError> {
    let user = app.account.login(email, password).await?;
    println!("Signed in.");
    print_profile(&user);
    Ok(())
}

pub async fn signup(app: &App, email: &str, password: &str, name: &str) -> Result<(), AppError> {
    let user = app.account.signup(email, password, name).await?;
    println!("Account created.");
    print_profile(&user);
    Ok(())
}

pub async fn oauth_callback(app: &App, token: &str) -> Result<(), AppError> {
    let user = app.account.complete_oauth_callback(token).await?;
    println!("Signed in.");
    print_profile(&user);
    Ok(())
}

pub fn logout(app: &App) -> Result<(), AppError> {
    app.account.logout();
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(app: &App, refresh: bool) -> Result<(), AppError> {
    app.require_login()?;
    let user = if refresh {
        Some(app.account.guard(app.account.refresh_profile().await)?)
    } else {
        app.auth.user()
    };
    match user {
        Some(user) => print_profile(&user),
        None => println!("Signed in (profile not loaded; try --refresh)."),
    }
    Ok(())
}

pub fn upgrade(app: &App) -> Result<(), AppError> {
    app.require_login()?;
    let user = app.account.upgrade()?;
    println!("Welcome to the Expert tier! Expert models, Expert Advice and prompt rewrites are unlocked.");
    print_profile(&user);
    Ok(())
}
