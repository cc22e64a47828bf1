use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 120)),
        eframe::egui::StrokeKind::Inside,
    );
}

pub(super) fn chart_to_screen(rect: Rect, point: Pos2) -> Pos2 {
    rect.min + point.to_vec2()
}

pub(super) fn screen_to_chart(rect: Rect, point: Pos2) -> Pos2 {
    (point - rect.min).to_pos2()
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn blend_moves_toward_overlay() {
        let blended = blend_color(Color32::BLACK, Color32::WHITE, 0.5);
        assert_eq!(blended.r(), 127);
        assert_eq!(blend_color(Color32::RED, Color32::WHITE, 0.0), Color32::RED);
    }

    #[test]
    fn chart_origin_is_the_canvas_corner() {
        let rect = Rect::from_min_max(pos2(300.0, 40.0), pos2(1_260.0, 680.0));

        assert_eq!(chart_to_screen(rect, pos2(0.0, 0.0)), rect.min);
        assert_eq!(screen_to_chart(rect, pos2(310.0, 45.0)), pos2(10.0, 5.0));
        assert!(circle_visible(rect, pos2(290.0, 50.0), 20.0));
        assert!(!circle_visible(rect, pos2(200.0, 50.0), 20.0));
    }
}
