use paperbox_camtools::{
    ArcExpander, Bounds, Design, LaserSettings, PaperBoxMaker, PaperBoxParameters, Plotter,
    Tracer,
};
use paperbox_core::Layer;

fn tuckbox() -> PaperBoxMaker {
    PaperBoxMaker::new(PaperBoxParameters {
        x: 60.0,
        y: 40.0,
        h: 100.0,
        design: Design::Tuckbox,
        ..Default::default()
    })
    .unwrap()
}

/// Records every call so the style switching can be inspected.
#[derive(Default)]
struct Recorder {
    style: Option<Layer>,
    calls: Vec<(Layer, &'static str)>,
}

impl Plotter for Recorder {
    fn move_to(&mut self, _x: f64, _y: f64, _angle: f64) {
        self.calls.push((self.style(), "move_to"));
    }

    fn edge(&mut self, _length: f64) {
        self.calls.push((self.style(), "edge"));
    }

    fn corner(&mut self, _angle: f64, _radius: f64) {
        self.calls.push((self.style(), "corner"));
    }

    fn style(&self) -> Layer {
        self.style.unwrap_or(Layer::Cut)
    }

    fn set_style(&mut self, layer: Layer) {
        self.style = Some(layer);
    }
}

#[test]
fn test_render_drives_plotter_per_step() {
    let maker = tuckbox();
    let path = maker.generate().path;
    let mut recorder = Recorder::default();
    maker.render(&mut recorder);

    assert_eq!(recorder.calls.len(), path.len() + 1);
    assert_eq!(recorder.calls[0].1, "move_to");
    let creased = recorder
        .calls
        .iter()
        .filter(|(layer, _)| *layer == Layer::Crease)
        .count();
    assert_eq!(creased, 7);
    // Style is restored after every step.
    assert_eq!(recorder.style(), Layer::Cut);
}

#[test]
fn test_render_through_trait_object() {
    let maker = tuckbox();
    let mut tracer = Tracer::default();
    let plotter: &mut dyn Plotter = &mut tracer;
    maker.render(plotter);
    assert!(!tracer.strokes().is_empty());
}

#[test]
fn test_traced_outline_closes() {
    let strokes = tuckbox().trace(ArcExpander::default());
    let first = strokes.first().unwrap().points[0];
    let last_cut = strokes
        .iter()
        .filter(|stroke| stroke.layer == Layer::Cut)
        .last()
        .unwrap();
    let end = *last_cut.points.last().unwrap();
    assert!(first.distance_to(&end) < 1e-6, "{:?} vs {:?}", first, end);
}

#[test]
fn test_traced_layers() {
    let strokes = tuckbox().trace(ArcExpander::default());
    let crease_strokes: Vec<_> = strokes
        .iter()
        .filter(|stroke| stroke.layer == Layer::Crease)
        .collect();
    assert_eq!(crease_strokes.len(), 7);
    assert!(strokes.iter().all(|stroke| stroke.layer != Layer::Travel));
    assert!(strokes.iter().any(|stroke| stroke.layer == Layer::Mark));
}

#[test]
fn test_widebox_bounds() {
    let maker = PaperBoxMaker::new(PaperBoxParameters {
        x: 100.0,
        y: 150.0,
        h: 30.0,
        mark_length: 0.0,
        ..Default::default()
    })
    .unwrap();
    let strokes = maker.trace(ArcExpander::default());
    let bounds = Bounds::of(&strokes).unwrap();
    // Glue tabs of y/2 stick out on both sides of the panel; the lid flap
    // tops two panel heights and the lid side.
    assert!(bounds.min_y.abs() < 1e-6);
    assert!((bounds.width() - 250.0).abs() < 1e-6);
    assert!((bounds.height() - 375.0).abs() < 1e-6);
}

#[test]
fn test_gcode_output() {
    let gcode = tuckbox().to_gcode(&LaserSettings::default(), 0.5);
    assert!(gcode.starts_with("; Paper Box Maker G-code"));
    assert!(gcode.contains("; Design: tuckbox"));
    assert!(gcode.contains("M3 S250 ; Laser on"));
    assert!(gcode.contains("M3 S400 ; Laser on"));
    assert_eq!(
        gcode.matches("M3 ").count(),
        gcode.matches("M5 ; Laser off").count()
    );
    assert!(gcode.trim_end().ends_with("; Return to origin"));
}

#[test]
fn test_svg_output() {
    let svg = tuckbox().to_svg(0.5);
    assert!(svg.contains("<svg"));
    assert!(svg.contains("stroke=\"#ff0000\""));
    assert!(svg.contains("stroke=\"#0000ff\""));
    assert!(svg.trim_end().ends_with("</svg>"));
}
