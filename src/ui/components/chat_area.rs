use eframe::egui;

use crate::common::ChatMessage;
use crate::ui::state::AppState;

const SENT_FILL: egui::Color32 = egui::Color32::from_rgb(0xDC, 0xF8, 0xC6);
const RECEIVED_FILL: egui::Color32 = egui::Color32::from_rgb(0xEE, 0xEE, 0xEE);
const SUGGESTION_FILL: egui::Color32 = egui::Color32::from_rgb(0xF0, 0xF8, 0xFF);

/// What the user clicked while the conversation was drawn.
#[derive(Default)]
pub struct ChatActions {
    pub suggest_for: Option<String>,
    /// `(message_id, to_user)`
    pub send_suggestion: Option<(String, String)>,
}

pub fn render(ui: &mut egui::Ui, state: &AppState) -> ChatActions {
    let mut actions = ChatActions::default();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if state.conversation.is_empty() {
                ui.label(egui::RichText::new("No messages yet").weak());
            }
            for message in &state.conversation {
                ui.push_id(&message.id, |ui| {
                    if message.is_sent() {
                        ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                            bubble(ui, SENT_FILL, &format!("You → {}", message.to_user), message);
                        });
                    } else {
                        bubble(ui, RECEIVED_FILL, &format!("{} → You", message.from_user), message);
                        suggestion_controls(ui, state, message, &mut actions);
                    }
                });
            }
        });

    actions
}

fn bubble(ui: &mut egui::Ui, fill: egui::Color32, header: &str, message: &ChatMessage) {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(12.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_max_width(ui.available_width() * 0.7);
            ui.label(egui::RichText::new(header).strong().color(egui::Color32::BLACK));
            ui.label(egui::RichText::new(&message.content).color(egui::Color32::BLACK));
            ui.label(
                egui::RichText::new(&message.timestamp)
                    .small()
                    .color(egui::Color32::DARK_GRAY),
            );
        });
}

fn suggestion_controls(
    ui: &mut egui::Ui,
    state: &AppState,
    message: &ChatMessage,
    actions: &mut ChatActions,
) {
    let pending = state.pending_suggestions.contains(&message.id);
    ui.horizontal(|ui| {
        let suggest = ui.add_enabled(!pending, egui::Button::new("🤖 Suggest a reply"));
        if suggest.clicked() {
            actions.suggest_for = Some(message.id.clone());
        }
        if pending {
            ui.spinner();
        }
    });

    if let Some(suggestion) = state.suggestions.get(&message.id) {
        egui::Frame::new()
            .fill(SUGGESTION_FILL)
            .corner_radius(12.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.7);
                ui.label(egui::RichText::new("💡 AI Suggestion:").color(egui::Color32::BLACK));
                ui.label(egui::RichText::new(&suggestion.draft_text).color(egui::Color32::BLACK));
            });

        let label = format!("Send AI reply to {}", message.from_user);
        if ui.button(label).clicked() {
            actions.send_suggestion = Some((message.id.clone(), message.from_user.clone()));
        }
    }
    ui.add_space(6.0);
}
