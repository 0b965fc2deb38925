//! Editor windows over the sandbox's light, material, camera, render pass
//! and texture.

use cgmath::Vector3;
use imgui::Condition;

use super::editor::{EditorTargets, EditorWindow};
use crate::gfx::camera::Projection;
use crate::gfx::rendering::Capability;
use crate::gfx::resources::TextureParameter;

const WIDTH: f32 = 300.0;

fn place(index: usize) -> [f32; 2] {
    [20.0, 20.0 + index as f32 * 140.0]
}

#[derive(Debug, Default)]
pub struct LightWindow;

impl EditorWindow for LightWindow {
    fn title(&self) -> &str {
        "Light"
    }

    fn draw(&mut self, ui: &imgui::Ui, targets: &mut EditorTargets<'_>) {
        let light = &mut *targets.light;
        ui.window(self.title())
            .position(place(0), Condition::FirstUseEver)
            .size([WIDTH, 120.0], Condition::FirstUseEver)
            .build(|| {
                ui.input_float3("Position", &mut light.position).build();
                ui.color_edit3("Color", &mut light.color);
            });
    }
}

#[derive(Debug, Default)]
pub struct MaterialWindow;

impl EditorWindow for MaterialWindow {
    fn title(&self) -> &str {
        "Material"
    }

    fn draw(&mut self, ui: &imgui::Ui, targets: &mut EditorTargets<'_>) {
        let material = &mut *targets.material;
        ui.window(self.title())
            .position(place(1), Condition::FirstUseEver)
            .size([WIDTH, 80.0], Condition::FirstUseEver)
            .build(|| {
                ui.color_edit3("Color", &mut material.color);
            });
    }
}

#[derive(Debug, Default)]
pub struct CameraWindow;

impl EditorWindow for CameraWindow {
    fn title(&self) -> &str {
        "Camera"
    }

    fn draw(&mut self, ui: &imgui::Ui, targets: &mut EditorTargets<'_>) {
        ui.window(self.title())
            .position(place(2), Condition::FirstUseEver)
            .size([WIDTH, 130.0], Condition::FirstUseEver)
            .build(|| {
                if let Projection::Perspective {
                    mut fov_degrees,
                    aspect,
                } = targets.camera.projection_kind()
                {
                    if ui.slider("FOV", 20.0, 120.0, &mut fov_degrees) {
                        targets.camera.set_perspective(fov_degrees, aspect);
                    }
                }

                let mut position: [f32; 3] = (*targets.camera_position).into();
                if ui.input_float3("Position", &mut position).build() {
                    *targets.camera_position = Vector3::from(position);
                    targets.camera_transform.translate(*targets.camera_position);
                }

                ui.text(format!(
                    "near {:.2} / far {:.1}",
                    targets.camera.near(),
                    targets.camera.far()
                ));
            });
    }
}

#[derive(Debug, Default)]
pub struct RenderPassWindow;

impl EditorWindow for RenderPassWindow {
    fn title(&self) -> &str {
        "Render Pass"
    }

    fn draw(&mut self, ui: &imgui::Ui, targets: &mut EditorTargets<'_>) {
        let render_pass = &mut *targets.render_pass;
        ui.window(self.title())
            .position(place(3), Condition::FirstUseEver)
            .size([WIDTH, 150.0], Condition::FirstUseEver)
            .build(|| {
                ui.color_edit3("Clear color", render_pass.clear_color_mut());
                for capability in Capability::ALL {
                    let mut enabled = render_pass.is_enabled(capability);
                    if ui.checkbox(format!("{capability:?}"), &mut enabled) {
                        render_pass.set_enabled(capability, enabled);
                    }
                }
            });
    }
}

#[derive(Debug, Default)]
pub struct TextureWindow;

impl EditorWindow for TextureWindow {
    fn title(&self) -> &str {
        "Texture"
    }

    fn draw(&mut self, ui: &imgui::Ui, targets: &mut EditorTargets<'_>) {
        let texture = &mut *targets.texture;
        ui.window(self.title())
            .position(place(4), Condition::FirstUseEver)
            .size([WIDTH, 130.0], Condition::FirstUseEver)
            .build(|| {
                let (width, height) = texture.size();
                ui.text(format!("{}: {width}x{height}", texture.label()));

                let mut settings = texture.settings();
                ui.text("Min filter");
                ui.same_line();
                let min = ui.radio_button("Nearest##min", &mut settings.min_filter, wgpu::FilterMode::Nearest)
                    | ui.radio_button("Linear##min", &mut settings.min_filter, wgpu::FilterMode::Linear);
                ui.text("Mag filter");
                ui.same_line();
                let mag = ui.radio_button("Nearest##mag", &mut settings.mag_filter, wgpu::FilterMode::Nearest)
                    | ui.radio_button("Linear##mag", &mut settings.mag_filter, wgpu::FilterMode::Linear);

                if min {
                    texture.parameter(TextureParameter::MinFilter(settings.min_filter));
                }
                if mag {
                    texture.parameter(TextureParameter::MagFilter(settings.mag_filter));
                }
            });
    }
}

#[derive(Debug, Default)]
pub struct StatsWindow;

impl EditorWindow for StatsWindow {
    fn title(&self) -> &str {
        "Stats"
    }

    fn draw(&mut self, ui: &imgui::Ui, targets: &mut EditorTargets<'_>) {
        let stats = targets.stats;
        let show_colliders = &mut *targets.show_colliders;
        ui.window(self.title())
            .position([ui.io().display_size[0] - WIDTH - 20.0, 20.0], Condition::FirstUseEver)
            .size([WIDTH, 150.0], Condition::FirstUseEver)
            .build(|| {
                let fps = if stats.delta > 0.0 { 1.0 / stats.delta } else { 0.0 };
                ui.text(format!("{:.1} fps ({:.2} ms)", fps, stats.delta * 1000.0));
                ui.text(format!("frame {} at {:.1}s", stats.frame_index, stats.total_time));
                ui.text(format!("{} draw calls", stats.draw_calls));
                match stats.last_hit {
                    Some(hit) => ui.text(format!("last hit: #{} at {:.2}", hit.id, hit.distance)),
                    None => ui.text("last hit: none"),
                }
                ui.checkbox("Show colliders", show_colliders);
            });
    }
}
