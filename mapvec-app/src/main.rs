use anyhow::Context;
use mapvec::{
    input::PointerEvent,
    layers::{Color, PathStyle},
    rendering::{canvas::DrawCommand, RenderBackend},
    CanvasBackend, Circle, CircleMarker, Crs, LatLng, MapView, Point, Polygon, Polyline,
    Renderer, RendererProfile, SvgBackend, Viewport,
};
use std::time::Duration;

/// Adds the same handful of shapes to a renderer
fn populate<B: RenderBackend>(renderer: &mut Renderer<B>) -> anyhow::Result<()> {
    renderer.add_path(
        Polyline::new(vec![
            LatLng::new(51.5074, -0.1278),
            LatLng::new(48.8566, 2.3522),
            LatLng::new(52.5200, 13.4050),
        ])
        .with_style(PathStyle::default().with_weight(4.0)),
    )?;
    renderer.add_path(
        Polygon::new(vec![
            LatLng::new(50.0, 0.0),
            LatLng::new(50.0, 5.0),
            LatLng::new(47.0, 5.0),
            LatLng::new(47.0, 0.0),
        ])
        .with_style(PathStyle::filled().with_color(Color::rgb(0xe3, 0x1a, 0x1c))),
    )?;
    renderer.add_path(Circle::new(LatLng::new(48.8566, 2.3522), 50_000.0)?)?;
    renderer.add_path(CircleMarker::new(LatLng::new(52.5200, 13.4050)).with_radius(8.0)?)?;
    Ok(())
}

fn strokes(commands: &[DrawCommand]) -> usize {
    commands
        .iter()
        .filter(|command| matches!(command, DrawCommand::Stroke { .. }))
        .count()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut view = Viewport::new(
        Crs::epsg3857(),
        LatLng::new(50.0, 4.0),
        5.0,
        Point::new(1024.0, 768.0),
    );

    let mut canvas = Renderer::with_profile(CanvasBackend::new(), &RendererProfile::Balanced);
    let mut svg = Renderer::with_profile(SvgBackend::new(), &RendererProfile::HighQuality);
    populate(&mut canvas).context("populating canvas renderer")?;
    populate(&mut svg).context("populating svg renderer")?;
    canvas.attach(&view)?;
    svg.attach(&view)?;
    log::info!(
        "attached {} paths, canvas surface {:?}",
        canvas.len(),
        canvas.bounds()
    );

    // Pan in steps; each step is one animation frame
    let mut ticker = tokio::time::interval(Duration::from_millis(16));
    for _ in 0..10 {
        ticker.tick().await;
        view.pan_by(Point::new(40.0, 0.0));
        canvas.on_move(&view)?;
        svg.on_move(&view)?;
        if canvas.on_animation_frame() {
            log::debug!("canvas frame: {} strokes", strokes(canvas.backend().commands()));
        }
    }
    canvas.on_move_end(&view)?;
    svg.on_move_end(&view)?;

    let center = view.center();
    canvas.on_zoom_anim(&view, center, 6.0);
    svg.on_zoom_anim(&view, center, 6.0);
    view.set_zoom(6.0);
    canvas.on_zoom(&view);
    svg.on_zoom(&view);
    canvas.on_zoom_end(&view)?;
    svg.on_zoom_end(&view)?;
    canvas.on_move_end(&view)?;
    svg.on_move_end(&view)?;
    canvas.on_animation_frame();

    let size = view.size();
    let events = canvas.handle_pointer(PointerEvent::Move {
        container_point: Point::new(size.x / 2.0, size.y / 2.0),
    });
    log::info!("pointer at center: {:?}", events);

    let elements: Vec<_> = svg.backend().elements().collect();
    println!("{}", serde_json::to_string_pretty(&elements)?);
    println!("{}", svg.backend().to_svg_string());
    Ok(())
}
