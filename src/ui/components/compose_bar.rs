use eframe::egui;

use crate::ui::state::AppState;

/// Recipient + message inputs. Returns `(to_user, content)` on send.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> Option<(String, String)> {
    let mut send = false;
    ui.horizontal(|ui| {
        ui.label("To");
        ui.add(
            egui::TextEdit::singleline(&mut state.recipient_input)
                .hint_text("username")
                .desired_width(120.0),
        );

        let response = ui.add(
            egui::TextEdit::singleline(&mut state.message_input)
                .hint_text("Message")
                .desired_width(ui.available_width() - 80.0),
        );
        if ui.button("📤 Send").clicked() {
            send = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
        }
    });

    if send {
        return state.take_outgoing();
    }

    None
}
