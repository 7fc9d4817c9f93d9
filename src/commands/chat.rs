use chatgrid::errors::AppError;
use chatgrid::models::Theme;
use chatgrid::registry::{self, ALL_MODELS_ID};
use chatgrid::service::{selection, SendOptions};

use super::{render, App};

pub fn models(app: &App) -> Result<(), AppError> {
    let premium = app.auth.is_premium();
    let selected = app.chats.selected_models();
    println!("  {:<10} {:<16} {}", "ID", "Name", "Description");
    for model in registry::all() {
        let mark = if selected.iter().any(|id| id == model.id) { "*" } else { " " };
        let lock = if model.is_available_to(premium) { "" } else { "  [Expert tier]" };
        println!("{mark} {:<10} {:<16} {}{lock}", model.id, model.display_name, model.description);
    }
    println!();
    println!("Use `{ALL_MODELS_ID}` to select every model available to you.");
    Ok(())
}

fn print_selection(ids: &[String]) {
    let names: Vec<&str> = ids.iter().map(|id| registry::display_name(id)).collect();
    println!("Selected: {}", names.join(", "));
}

pub fn select(app: &App, models: &[String]) -> Result<(), AppError> {
    let next = selection::select_models(&app.chats, models, app.auth.is_premium())?;
    print_selection(&next);
    Ok(())
}

pub fn toggle(app: &App, model: &str) -> Result<(), AppError> {
    let next = selection::toggle_model(&app.chats, model, app.auth.is_premium())?;
    print_selection(&next);
    Ok(())
}

pub async fn send(app: &App, message: &str, expert: bool) -> Result<(), AppError> {
    app.require_login()?;
    let options = if expert {
        SendOptions::with_expert_advice(app.auth.is_premium())?
    } else {
        SendOptions::default()
    };

    let send = app.dispatcher.send(message, options);
    tokio::pin!(send);
    let report = tokio::select! {
        report = &mut send => report?,
        // dropping `send` here also aborts the in-flight requests, unlike a
        // bare stop(); the process exits right after
        _ = tokio::signal::ctrl_c() => {
            app.dispatcher.stop();
            println!("Stopped.");
            return Ok(());
        }
    };

    render::report(&report);
    if let Some(conv) = app.chats.conversation(&report.conversation_id) {
        render::comparison(&conv.messages);
    }
    // a rejected token surfaces per model; translate it into a logout once
    if report.session_rejected() {
        app.account.logout();
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

pub fn new_conversation(app: &App, model: Option<&str>) -> Result<(), AppError> {
    let primary = match model {
        Some(id) => {
            registry::find(id).ok_or_else(|| AppError::UnknownModel { model_id: id.to_string() })?;
            id.to_string()
        }
        None => app
            .chats
            .selected_models()
            .into_iter()
            .next()
            .unwrap_or_else(|| registry::default_model(app.auth.is_premium()).id.to_string()),
    };
    let id = app.chats.create_conversation(&primary);
    println!("Started conversation {id}");
    Ok(())
}

pub fn use_conversation(app: &App, id: &str) -> Result<(), AppError> {
    app.chats.set_current_conversation(id)?;
    println!("Active conversation: {id}");
    Ok(())
}

pub fn history(app: &App) -> Result<(), AppError> {
    let conversations = app.chats.conversations_by_recency();
    if conversations.is_empty() {
        println!("No conversations yet");
        return Ok(());
    }
    let active = app.chats.current_conversation_id();
    for conv in &conversations {
        render::conversation_line(conv, active.as_deref() == Some(conv.id.as_str()));
    }
    Ok(())
}

pub fn show(app: &App, id: Option<&str>) -> Result<(), AppError> {
    let conv = match id {
        Some(id) => app.chats.conversation(id),
        None => app.chats.active_conversation(),
    };
    match conv {
        Some(conv) => render::conversation(&conv),
        None => {
            return Err(AppError::ConversationNotFound {
                id: id.unwrap_or("(active)").to_string(),
            })
        }
    }
    Ok(())
}

pub fn clear(app: &App, id: Option<&str>, all: bool) -> Result<(), AppError> {
    match (id, all) {
        (_, true) => {
            app.chats.clear_all_conversations();
            println!("All conversations deleted.");
        }
        (Some(id), false) => {
            app.chats.clear_conversation(id);
            println!("Conversation {id} deleted.");
        }
        (None, false) => match app.chats.current_conversation_id() {
            Some(id) => {
                app.chats.clear_conversation(&id);
                println!("Conversation {id} deleted.");
            }
            None => println!("No active conversation."),
        },
    }
    Ok(())
}

pub fn theme(app: &App, theme: Option<&str>) -> Result<(), AppError> {
    if let Some(raw) = theme {
        let theme: Theme = raw.parse().map_err(|_| AppError::InvalidValue {
            field_name: "theme".to_string(),
            value: raw.to_string(),
        })?;
        app.chats.set_theme(theme);
    }
    println!("Theme: {}", app.chats.theme());
    Ok(())
}
