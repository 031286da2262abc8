use std::collections::HashMap;

use eframe::egui;

use crate::model::ImageHandle;
use crate::render::Surface;
use crate::view::ViewTransform;

/// [`Surface`] over an egui painter. Logical points go through
/// [`ViewTransform::project`] and are then offset by the canvas origin.
pub(super) struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    backdrop: egui::Color32,
    textures: &'a HashMap<ImageHandle, egui::TextureHandle>,
    view: ViewTransform,
}

impl<'a> EguiSurface<'a> {
    pub(super) fn new(
        painter: &'a egui::Painter,
        origin: egui::Pos2,
        backdrop: egui::Color32,
        textures: &'a HashMap<ImageHandle, egui::TextureHandle>,
    ) -> Self {
        Self {
            painter,
            origin,
            backdrop,
            textures,
            view: ViewTransform::default(),
        }
    }

    fn to_screen(&self, p: egui::Pos2) -> egui::Pos2 {
        self.view.project(p) + self.origin.to_vec2()
    }

    fn corners(&self, rect: egui::Rect) -> [egui::Pos2; 4] {
        [
            self.to_screen(rect.left_top()),
            self.to_screen(rect.right_top()),
            self.to_screen(rect.right_bottom()),
            self.to_screen(rect.left_bottom()),
        ]
    }
}

impl Surface for EguiSurface<'_> {
    fn set_transform(&mut self, view: &ViewTransform) {
        self.view = *view;
    }

    fn clear(&mut self) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, self.backdrop);
    }

    fn fill_rect(&mut self, rect: egui::Rect, color: egui::Color32) {
        self.painter.add(egui::Shape::convex_polygon(
            self.corners(rect).to_vec(),
            color,
            egui::Stroke::NONE,
        ));
    }

    fn line(&mut self, a: egui::Pos2, b: egui::Pos2, width: f32, color: egui::Color32) {
        let stroke = egui::Stroke::new(width * self.view.scale(), color);
        self.painter
            .line_segment([self.to_screen(a), self.to_screen(b)], stroke);
    }

    fn blit(&mut self, image: ImageHandle, source: egui::Rect, dest: egui::Rect) {
        let Some(texture) = self.textures.get(&image) else {
            return;
        };
        let size = texture.size_vec2();
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let uv = egui::Rect::from_min_max(
            (source.min.to_vec2() / size).to_pos2(),
            (source.max.to_vec2() / size).to_pos2(),
        );
        let uvs = [
            uv.left_top(),
            uv.right_top(),
            uv.right_bottom(),
            uv.left_bottom(),
        ];

        let mut mesh = egui::Mesh::with_texture(texture.id());
        for (pos, uv) in self.corners(dest).into_iter().zip(uvs) {
            mesh.vertices.push(egui::epaint::Vertex {
                pos,
                uv,
                color: egui::Color32::WHITE,
            });
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        self.painter.add(egui::Shape::mesh(mesh));
    }
}
