use eframe::egui;

use crate::common::NoticeLevel;
use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Activity");
    ui.separator();

    if let Some(identity) = &state.identity {
        ui.horizontal(|ui| {
            ui.label("Node:");
            ui.label(&identity.username);
        });
        if !identity.peer_id.is_empty() {
            ui.label(egui::RichText::new(short_peer_id(&identity.peer_id)).weak());
        }
        ui.label(format!("Listening on {} addresses", identity.addrs.len()));
        ui.separator();
    }

    ui.horizontal(|ui| {
        ui.label("Messages in view:");
        ui.label(format!("{}", state.conversation.len()));
    });
    ui.horizontal(|ui| {
        ui.label("Drafting:");
        ui.label(format!("{}", state.pending_suggestions.len()));
    });

    ui.separator();

    ui.label("Recent notices:");
    egui::ScrollArea::vertical()
        .max_height(400.0)
        .show(ui, |ui| {
            for notice in state.notices.iter().rev().take(30) {
                let time_str = notice.timestamp.format("%H:%M:%S");
                let color = match notice.level {
                    NoticeLevel::Info => egui::Color32::GREEN,
                    NoticeLevel::Error => egui::Color32::RED,
                };

                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(color, format!("[{}]", time_str));
                    ui.label(&notice.message);
                });
            }
        });
}

/// First 16 characters; the node may hand back raw multihash bytes.
fn short_peer_id(peer_id: &str) -> String {
    peer_id.chars().take(16).collect()
}
