use mapvec::{
    geometry::{clip_polygon, clip_segment, simplify},
    Bounds, CoordinateTransform, Crs, LatLng, LatLngBounds, MapView, Point, Viewport,
};

fn sample_points() -> Vec<LatLng> {
    vec![
        LatLng::new(0.0, 0.0),
        LatLng::new(51.5074, -0.1278),
        LatLng::new(-33.8688, 151.2093),
        LatLng::new(64.1466, -21.9426),
        LatLng::new(-54.8019, -68.3030),
    ]
}

#[test]
fn test_earth_crs_round_trip() {
    for crs in [Crs::epsg3857(), Crs::epsg3395(), Crs::epsg4326()] {
        for lat_lng in sample_points() {
            for zoom in [0.0, 5.0, 12.5] {
                let point = crs.lat_lng_to_point(&lat_lng, zoom);
                let back = crs.point_to_lat_lng(&point, zoom);
                assert!(
                    back.equals_within(&lat_lng, 1e-6),
                    "{:?} at z{}: {} -> {}",
                    crs.code(),
                    zoom,
                    lat_lng,
                    back
                );
            }
        }
    }
}

#[test]
fn test_world_origin_pixels() {
    let origin = LatLng::new(0.0, 0.0);
    assert_eq!(Crs::epsg3857().lat_lng_to_point(&origin, 0.0), Point::new(128.0, 128.0));
    assert_eq!(Crs::epsg3857().lat_lng_to_point(&origin, 1.0), Point::new(256.0, 256.0));
    assert_eq!(Crs::epsg4326().lat_lng_to_point(&origin, 0.0), Point::new(256.0, 128.0));
    assert_eq!(Crs::simple().lat_lng_to_point(&LatLng::new(10.0, 20.0), 0.0), Point::new(20.0, -10.0));
}

#[test]
fn test_transform_bounds_through_trait() {
    let crs = Crs::epsg3857();
    let bounds = LatLngBounds::from_coords(-10.0, -10.0, 10.0, 10.0);
    let px = CoordinateTransform::transform_bounds(&crs, &bounds, 2.0);
    assert!(px.contains(&Point::new(512.0, 512.0)));
    assert!(px.width() > 0.0 && px.height() > 0.0);
}

#[test]
fn test_wrap_is_idempotent() {
    let crs = Crs::epsg3857();
    for lng in [-540.0, -181.0, -180.0, 0.0, 179.5, 180.0, 190.0, 725.0] {
        let once = crs.wrap_lat_lng(&LatLng::new(10.0, lng));
        let twice = crs.wrap_lat_lng(&once);
        assert_eq!(once, twice);
        assert!(once.lng >= -180.0 && once.lng < 180.0, "lng {} wrapped to {}", lng, once.lng);
    }
    assert_eq!(crs.wrap_lat_lng(&LatLng::new(10.0, 190.0)).lng, -170.0);
    assert_eq!(Crs::simple().wrap_lat_lng(&LatLng::new(10.0, 190.0)).lng, 190.0);
}

#[test]
fn test_haversine_london_paris() {
    let london = LatLng::new(51.5074, -0.1278);
    let paris = LatLng::new(48.8566, 2.3522);
    let km = Crs::epsg3857().distance(&london, &paris) / 1000.0;
    assert!((km - 343.5).abs() < 2.0, "distance {} km", km);
    assert_eq!(Crs::simple().distance(&LatLng::new(0.0, 0.0), &LatLng::new(3.0, 4.0)), 5.0);
}

#[test]
fn test_viewport_layer_points() {
    let view = Viewport::new(Crs::epsg3857(), LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0));
    let center = view.lat_lng_to_layer_point(&LatLng::new(0.0, 0.0));
    assert_eq!(center, Point::new(400.0, 300.0));
    let back = view.layer_point_to_lat_lng(&center);
    assert!(back.equals_within(&LatLng::new(0.0, 0.0), 1e-9));
}

#[test]
fn test_bounds_of_two_points() {
    let bounds = Bounds::from_points(&[Point::new(10.0, 10.0), Point::new(40.0, 60.0)]);
    assert_eq!(bounds.min, Point::new(10.0, 10.0));
    assert_eq!(bounds.max, Point::new(40.0, 60.0));
    assert_eq!(bounds.size(), Point::new(30.0, 50.0));
}

#[test]
fn test_simplify_drops_near_collinear_point() {
    let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.01), Point::new(2.0, 0.0)];
    assert_eq!(simplify(&points, 1.0), vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]);

    let once = simplify(&points, 1.0);
    assert_eq!(simplify(&once, 1.0), once);
}

#[test]
fn test_segment_clipping() {
    let bounds = Bounds::from_coords(0.0, 0.0, 10.0, 10.0);

    let inside = clip_segment(&Point::new(1.0, 1.0), &Point::new(9.0, 9.0), &bounds, None, false).unwrap();
    assert_eq!(inside.segment, Some((Point::new(1.0, 1.0), Point::new(9.0, 9.0))));

    let left = clip_segment(&Point::new(-5.0, 1.0), &Point::new(-1.0, 9.0), &bounds, None, false).unwrap();
    assert_eq!(left.segment, None);
}

#[test]
fn test_polygon_clipping() {
    let square = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ];
    let clipped = clip_polygon(&square, &Bounds::from_coords(5.0, 5.0, 15.0, 15.0), false).unwrap();
    let expected = [
        Point::new(5.0, 5.0),
        Point::new(10.0, 5.0),
        Point::new(10.0, 10.0),
        Point::new(5.0, 10.0),
    ];
    assert_eq!(clipped.len(), 4);
    for point in expected {
        assert!(clipped.contains(&point), "missing {:?} in {:?}", point, clipped);
    }

    let inside = clip_polygon(&square, &Bounds::from_coords(-1.0, -1.0, 11.0, 11.0), false).unwrap();
    assert_eq!(inside, square.to_vec());
}
