use image::{Rgba, RgbaImage};
use sneaky_doctor_core::{GameConfig, GridCell, Layer, RealPosition, RealRect};
use sneaky_doctor_level::{LoadError, LoadErrorKind, MapDecoder, MapMarker, MapPixel};

const FLOOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const WALL: Rgba<u8> = Rgba([0, 0, 0, 255]);
const EXIT: Rgba<u8> = Rgba([0, 255, 0, 255]);
const MASK: Rgba<u8> = Rgba([255, 0, 0, 255]);
const START: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn blank_map() -> RgbaImage {
    RgbaImage::from_pixel(32, 31, FLOOR)
}

fn playable_map() -> RgbaImage {
    let mut image = blank_map();
    image.put_pixel(3, 1, WALL);
    image.put_pixel(4, 1, WALL);
    image.put_pixel(0, 10, WALL);
    image.put_pixel(20, 0, EXIT);
    image.put_pixel(7, 8, MASK);
    image.put_pixel(2, 9, MASK);
    image.put_pixel(5, 5, START);
    image
}

#[test]
fn walls_become_block_sized_rects_in_row_major_order() {
    let config = GameConfig::default();
    let map = MapDecoder::new(&config)
        .decode(&playable_map())
        .expect("map decodes");

    let walls: Vec<(GridCell, RealRect, Layer)> = map
        .walls
        .iter()
        .map(|wall| (wall.cell, wall.rect, wall.layer))
        .collect();
    assert_eq!(
        walls,
        vec![
            (
                GridCell::new(3, 1),
                RealRect::square(RealPosition::new(90, 30), 30),
                Layer::new(1)
            ),
            (
                GridCell::new(4, 1),
                RealRect::square(RealPosition::new(120, 30), 30),
                Layer::new(1)
            ),
            (
                GridCell::new(0, 10),
                RealRect::square(RealPosition::new(0, 300), 30),
                Layer::new(10)
            ),
        ]
    );
    assert_eq!(map.wall_rects().len(), 3);
}

#[test]
fn markers_and_masks_are_located() {
    let config = GameConfig::default();
    let map = MapDecoder::new(&config)
        .decode(&playable_map())
        .expect("map decodes");

    assert_eq!(map.start, GridCell::new(5, 5));
    assert_eq!(map.exit.cell, GridCell::new(20, 0));
    assert_eq!(
        map.exit.rect,
        RealRect::square(RealPosition::new(600, 0), 30)
    );
    assert_eq!(map.exit.lower_layer, Layer::new(0));
    assert_eq!(map.exit.upper_layer, Layer::new(1));
    assert_eq!(map.masks, vec![GridCell::new(7, 8), GridCell::new(2, 9)]);
}

#[test]
fn block_size_scales_real_positions() {
    let config = GameConfig::for_block_size(10);
    let decoder = MapDecoder::new(&config);
    let map = decoder.decode(&playable_map()).expect("map decodes");

    assert_eq!(
        map.walls[2].rect,
        RealRect::square(RealPosition::new(0, 100), 10)
    );
    assert_eq!(
        decoder.real_position(map.start),
        RealPosition::new(50, 50)
    );
}

#[test]
fn missing_start_is_rejected() {
    let mut image = playable_map();
    image.put_pixel(5, 5, FLOOR);

    let error = MapDecoder::new(&GameConfig::default())
        .decode(&image)
        .expect_err("start is required");

    assert_eq!(error.kind(), LoadErrorKind::MapMissingMarker);
    assert!(matches!(
        error,
        LoadError::MapMissingMarker {
            marker: MapMarker::Start
        }
    ));
}

#[test]
fn missing_exit_is_rejected() {
    let mut image = playable_map();
    image.put_pixel(20, 0, FLOOR);

    let error = MapDecoder::new(&GameConfig::default())
        .decode(&image)
        .expect_err("exit is required");

    assert!(matches!(
        error,
        LoadError::MapMissingMarker {
            marker: MapMarker::Exit
        }
    ));
}

#[test]
fn wrong_dimensions_are_rejected_before_scanning() {
    let image = RgbaImage::from_pixel(31, 31, FLOOR);

    let error = MapDecoder::new(&GameConfig::default())
        .decode(&image)
        .expect_err("size must match the grid");

    assert_eq!(error.kind(), LoadErrorKind::MapDimension);
    assert_eq!(
        error.to_string(),
        "map image is 31x31, expected 32x31"
    );
}

#[test]
fn duplicate_markers_keep_the_last_occurrence() {
    let mut image = playable_map();
    image.put_pixel(9, 12, START);

    let map = MapDecoder::new(&GameConfig::default())
        .decode(&image)
        .expect("map decodes");

    assert_eq!(map.start, GridCell::new(9, 12));
}

#[test]
fn translucent_marker_colours_are_floor() {
    assert_eq!(MapPixel::classify(&Rgba([0, 0, 0, 128])), MapPixel::Floor);
    assert_eq!(MapPixel::classify(&WALL), MapPixel::Wall);
    assert_eq!(MapPixel::classify(&MASK), MapPixel::Mask);
}
