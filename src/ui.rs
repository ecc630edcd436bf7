use egui::Context;

use crate::controller::input::{Command, CommandQueue};
use crate::model::claw::{Claw, ClawState};

/// Run egui for one frame with the given raw input and return its output.
/// Used by the WASM frame loop; the native build drives the same panels
/// through egui-winit.
pub fn build_ui(
    egui_ctx: &Context,
    raw_input: egui::RawInput,
    claw: &Claw,
    prize_count: usize,
    fps: f32,
    commands: &mut CommandQueue,
) -> egui::FullOutput {
    egui_ctx.run(raw_input, |ctx| {
        draw_panels(ctx, claw, prize_count, fps, commands);
    })
}

pub fn draw_panels(
    ctx: &Context,
    claw: &Claw,
    prize_count: usize,
    fps: f32,
    commands: &mut CommandQueue,
) {
    draw_status_window(ctx, claw, prize_count, fps);
    draw_controls(ctx, commands);
}

fn draw_status_window(ctx: &Context, claw: &Claw, prize_count: usize, fps: f32) {
    let state = match claw.state {
        ClawState::Idle => "idle",
        ClawState::Dropping => "dropping",
    };

    egui::Window::new("Status")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {fps:.0}")).small());
            ui.label(
                egui::RichText::new(format!(
                    "Claw: x: {:.1} y: {:.1} z: {:.1} ({state})",
                    claw.position.x, claw.position.y, claw.position.z
                ))
                .small(),
            );
            ui.label(egui::RichText::new(format!("Prizes: {prize_count}")).small());
            ui.separator();
            ui.label(egui::RichText::new("Arrows - Move claw").small());
            ui.label(egui::RichText::new("Space - Drop").small());
        });
}

/// On-screen control pad; clicks feed the same command queue as the keyboard.
fn draw_controls(ctx: &Context, commands: &mut CommandQueue) {
    egui::Area::new(egui::Id::new("controls"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -8.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let buttons = [
                    ("< Left", Command::MoveLeft),
                    ("Forward", Command::MoveForward),
                    ("Back", Command::MoveBack),
                    ("Right >", Command::MoveRight),
                    ("Drop", Command::Drop),
                ];
                for (label, command) in buttons {
                    if ui.button(label).clicked() {
                        commands.push(command);
                    }
                }
            });
        });
}
