use glam::Vec2;

use super::proximity::{within_range, SustainedProximity};

/// Brush-to-pet distance that counts as contact.
pub const BRUSH_CONTACT_DISTANCE: f32 = 80.0;
/// Brush travel since the last stroke that counts as a new stroke.
pub const STROKE_DISTANCE: f32 = 25.0;
/// Seconds out of contact before brushing ends.
pub const BRUSH_AWAY_GRACE: f32 = 3.0;

/// Result of one brushing tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushStep {
    Stroke,
    Holding,
    Ended,
}

/// An active brushing interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSession {
    pub strokes: u32,
    /// Brush position at contact start or at the last counted stroke.
    pub anchor: Vec2,
    contact: SustainedProximity,
}

impl BrushSession {
    pub fn begin(brush: Vec2) -> Self {
        Self {
            strokes: 0,
            anchor: brush,
            contact: SustainedProximity::new(BRUSH_CONTACT_DISTANCE, 0.0)
                .with_grace(BRUSH_AWAY_GRACE),
        }
    }

    /// Seconds since the brush left contact range.
    pub fn away_secs(&self) -> f32 {
        self.contact.away_secs()
    }

    pub fn update(&mut self, pet_center: Vec2, brush: Option<Vec2>, dt: f32) -> BrushStep {
        if self.contact.update(pet_center, brush, dt) {
            if let Some(brush) = brush {
                if brush.distance(self.anchor) > STROKE_DISTANCE {
                    self.strokes += 1;
                    self.anchor = brush;
                    return BrushStep::Stroke;
                }
            }
            return BrushStep::Holding;
        }

        if self.contact.is_lost() {
            BrushStep::Ended
        } else {
            BrushStep::Holding
        }
    }
}

/// Whether a held brush is close enough to start brushing.
pub fn in_contact(pet_center: Vec2, brush: Option<Vec2>) -> bool {
    within_range(pet_center, brush, BRUSH_CONTACT_DISTANCE)
}
