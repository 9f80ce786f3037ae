use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{Notice, SessionEvent, UserCommand};

use super::components::{
    chat_area::{self, ChatActions},
    compose_bar, notice_panel,
};
use super::state::AppState;

const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

pub struct ChatApp {
    state: AppState,
    command_sender: mpsc::Sender<UserCommand>,
    event_receiver: mpsc::Receiver<SessionEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        default_recipient: &str,
        command_sender: mpsc::Sender<UserCommand>,
        event_receiver: mpsc::Receiver<SessionEvent>,
    ) -> Self {
        Self {
            state: AppState::new(default_recipient),
            command_sender,
            event_receiver,
        }
    }

    fn handle_session_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply(event);
        }
    }

    fn send_command(&mut self, command: UserCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to session: {err}");
            self.state
                .push_notice(Notice::error(format!("Busy, try again ({err})")));
        }
    }

    fn dispatch(&mut self, actions: ChatActions) {
        if let Some(message_id) = actions.suggest_for {
            self.send_command(UserCommand::RequestSuggestion { message_id });
        }
        if let Some((message_id, to_user)) = actions.send_suggestion {
            self.send_command(UserCommand::SendSuggestion {
                message_id,
                to_user,
            });
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_session_events();

        egui::SidePanel::right("notice_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                notice_panel::render(ui, &self.state);
            });

        egui::TopBottomPanel::bottom("compose_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            if let Some((to_user, content)) = compose_bar::render(ui, &mut self.state) {
                self.send_command(UserCommand::SendMessage { to_user, content });
            }
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Chat history + AI co-pilot");
                let username = self.state.username();
                if !username.is_empty() {
                    ui.label(egui::RichText::new(username).weak());
                }
            });
            ui.separator();
            let actions = chat_area::render(ui, &self.state);
            self.dispatch(actions);
        });

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
