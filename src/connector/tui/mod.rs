//! Full-screen terminal front end for a [`crate::application::Conversation`].

mod app;
pub mod terminal;
pub mod ui;

pub use app::*;
pub use terminal::{AppEvent, EventHandler, Tui};

use tracing::{debug, info};

use crate::domain::DomainError;

/// Take over the terminal and run the chat until the user quits.
pub async fn run(mut app: ChatApp) -> Result<(), DomainError> {
    terminal::install_panic_hook();
    let mut tui = terminal::init()?;
    let mut events = EventHandler::new();

    info!("Chat UI started");
    let result = event_loop(&mut tui, &mut events, &mut app).await;
    terminal::restore()?;
    info!("Chat UI stopped");

    result
}

async fn event_loop(
    tui: &mut Tui,
    events: &mut EventHandler,
    app: &mut ChatApp,
) -> Result<(), DomainError> {
    while !app.should_quit() {
        tui.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            AppEvent::Key(key) => {
                if let Some(request) = app.handle_key(key) {
                    let tx = events.sender();
                    tokio::spawn(async move {
                        let completion = request.run().await;
                        if tx.send(AppEvent::Completed(completion)).is_err() {
                            debug!("Event loop closed before the request settled");
                        }
                    });
                }
            }
            AppEvent::Completed(completion) => app.on_completion(completion),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize(width, height) => debug!("Terminal resized to {width}x{height}"),
        }
    }

    Ok(())
}
