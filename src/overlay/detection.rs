use rand::Rng;
use serde::Serialize;

use super::Surface;

/// Roughly one new box every two seconds at 60 frames per second.
pub const SPAWN_PROBABILITY: f64 = 0.016;
pub const BOX_LIFE: u32 = 100;
const MIN_BOX_SIZE: f64 = 50.0;
const MAX_BOX_SIZE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Person,
    Car,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Person => "person",
            ObjectKind::Car => "car",
        }
    }

    fn rgb(self) -> (u8, u8, u8) {
        match self {
            ObjectKind::Person => (255, 0, 0),
            ObjectKind::Car => (0, 255, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeDetectionBox {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub kind: ObjectKind,
    pub confidence: f64,
    pub life: u32,
}

impl FakeDetectionBox {
    pub fn opacity(&self) -> f64 {
        f64::from(self.life) / f64::from(BOX_LIFE)
    }

    pub fn label(&self) -> String {
        format!("{} ({}%)", self.kind.as_str(), (self.confidence * 100.0).round() as u32)
    }

    fn render(&self) -> RenderedBox {
        let (r, g, b) = self.kind.rgb();
        let opacity = self.opacity();
        RenderedBox {
            x: self.x,
            y: self.y,
            size: self.size,
            kind: self.kind,
            opacity,
            color: format!("rgba({r}, {g}, {b}, {opacity})"),
            label: self.label(),
        }
    }
}

/// What the browser strokes onto the canvas for one box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedBox {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub kind: ObjectKind,
    pub opacity: f64,
    pub color: String,
    pub label: String,
}

/// Randomly spawned boxes that fade out. Nothing here looks at video content.
pub struct DetectionOverlay<R> {
    rng: R,
    spawn_probability: f64,
    boxes: Vec<FakeDetectionBox>,
}

impl<R: Rng> DetectionOverlay<R> {
    pub fn new(rng: R) -> Self {
        Self::with_spawn_probability(rng, SPAWN_PROBABILITY)
    }

    pub fn with_spawn_probability(rng: R, spawn_probability: f64) -> Self {
        Self {
            rng,
            spawn_probability: spawn_probability.clamp(0.0, 1.0),
            boxes: Vec::new(),
        }
    }

    pub fn boxes(&self) -> &[FakeDetectionBox] {
        &self.boxes
    }

    fn spawn(&mut self, surface: Surface) -> FakeDetectionBox {
        let size = self.rng.gen_range(MIN_BOX_SIZE..MAX_BOX_SIZE);
        let x = self.rng.gen::<f64>() * (surface.width - size).max(0.0);
        let y = self.rng.gen::<f64>() * (surface.height - size).max(0.0);
        let kind = if self.rng.gen_bool(0.5) {
            ObjectKind::Person
        } else {
            ObjectKind::Car
        };
        let confidence = self.rng.gen_range(0.5..1.0);

        FakeDetectionBox {
            x,
            y,
            size,
            kind,
            confidence,
            life: BOX_LIFE,
        }
    }

    /// Advances one frame: maybe spawn a box, age every box, drop the dead ones,
    /// and return what should be drawn.
    pub fn step(&mut self, surface: Surface) -> Vec<RenderedBox> {
        if self.rng.gen_bool(self.spawn_probability) {
            let spawned = self.spawn(surface);
            self.boxes.push(spawned);
        }

        for b in &mut self.boxes {
            b.life = b.life.saturating_sub(1);
        }
        self.boxes.retain(|b| b.life > 0);

        self.boxes.iter().map(FakeDetectionBox::render).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SURFACE: Surface = Surface {
        width: 640.0,
        height: 360.0,
    };

    #[test]
    fn test_same_seed_same_boxes() {
        let mut a = DetectionOverlay::new(ChaCha8Rng::seed_from_u64(42));
        let mut b = DetectionOverlay::new(ChaCha8Rng::seed_from_u64(42));

        for _ in 0..600 {
            assert_eq!(a.step(SURFACE), b.step(SURFACE));
        }
        assert_eq!(a.boxes(), b.boxes());
    }

    #[test]
    fn test_spawned_box_ranges() {
        let mut overlay = DetectionOverlay::with_spawn_probability(ChaCha8Rng::seed_from_u64(7), 1.0);

        for _ in 0..500 {
            overlay.step(SURFACE);
            let newest = overlay.boxes().last().unwrap();
            assert!((50.0..100.0).contains(&newest.size));
            assert!(newest.x >= 0.0 && newest.x + newest.size <= SURFACE.width);
            assert!(newest.y >= 0.0 && newest.y + newest.size <= SURFACE.height);
            assert!((0.5..1.0).contains(&newest.confidence));
        }
    }

    #[test]
    fn test_both_kinds_spawn() {
        let mut overlay = DetectionOverlay::with_spawn_probability(ChaCha8Rng::seed_from_u64(3), 1.0);
        for _ in 0..50 {
            overlay.step(SURFACE);
        }
        assert!(overlay.boxes().iter().any(|b| b.kind == ObjectKind::Person));
        assert!(overlay.boxes().iter().any(|b| b.kind == ObjectKind::Car));
    }

    #[test]
    fn test_box_fades_and_expires() {
        let mut overlay = DetectionOverlay::with_spawn_probability(ChaCha8Rng::seed_from_u64(1), 1.0);
        let first = overlay.step(SURFACE);
        assert_eq!(first.len(), 1);
        assert_eq!(overlay.boxes()[0].life, BOX_LIFE - 1);
        assert!((first[0].opacity - 0.99).abs() < 1e-9);

        overlay.spawn_probability = 0.0;
        for _ in 0..(BOX_LIFE - 2) {
            assert_eq!(overlay.step(SURFACE).len(), 1);
        }
        assert_eq!(overlay.boxes()[0].life, 1);
        assert!(overlay.step(SURFACE).is_empty());
        assert!(overlay.boxes().is_empty());
    }

    #[test]
    fn test_small_surface_pins_box_to_origin() {
        let mut overlay = DetectionOverlay::with_spawn_probability(ChaCha8Rng::seed_from_u64(9), 1.0);
        overlay.step(Surface::new(20.0, 20.0));
        let b = &overlay.boxes()[0];
        assert_eq!((b.x, b.y), (0.0, 0.0));
    }

    #[test]
    fn test_spawn_rate_is_sparse() {
        let mut overlay = DetectionOverlay::new(ChaCha8Rng::seed_from_u64(11));
        let mut spawned = 0;
        for _ in 0..6000 {
            overlay.step(SURFACE);
            spawned += overlay.boxes().iter().filter(|b| b.life == BOX_LIFE - 1).count();
        }
        // Expected ~96 over 100 seconds of frames.
        assert!((50..150).contains(&spawned), "spawned {spawned}");
    }

    #[test]
    fn test_render_colour_and_label() {
        let person = FakeDetectionBox {
            x: 1.0,
            y: 2.0,
            size: 60.0,
            kind: ObjectKind::Person,
            confidence: 0.876,
            life: 50,
        };
        let rendered = person.render();
        assert_eq!(rendered.color, "rgba(255, 0, 0, 0.5)");
        assert_eq!(rendered.label, "person (88%)");

        let car = FakeDetectionBox {
            kind: ObjectKind::Car,
            confidence: 0.5,
            life: 100,
            ..person
        };
        assert_eq!(car.render().color, "rgba(0, 255, 0, 1)");
        assert_eq!(car.label(), "car (50%)");
    }
}
