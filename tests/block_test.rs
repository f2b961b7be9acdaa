use std::sync::Arc;

use approx::assert_abs_diff_eq;
use block_ngin::data_structures::{
    block::{BlockKey, BlockKeyError, BlockSettings},
    light::Sun,
    material::Material,
};
use cgmath::{InnerSpace, Vector3};
use image::{Rgba, RgbaImage};

#[test]
fn block_key_string_form() {
    let key = BlockKey::new(1, -2, 30);
    assert_eq!(key.to_string(), "1,-2,30");
    assert_eq!("1,-2,30".parse::<BlockKey>().unwrap(), key);
    assert_eq!(" 4 , 5 ,6".parse::<BlockKey>().unwrap(), BlockKey::from((4, 5, 6)));
}

#[test]
fn malformed_block_keys() {
    assert!(matches!("1,2".parse::<BlockKey>(), Err(BlockKeyError::Arity(_))));
    assert!(matches!("1,2,3,4".parse::<BlockKey>(), Err(BlockKeyError::Arity(_))));
    assert!(matches!("1,x,3".parse::<BlockKey>(), Err(BlockKeyError::Coordinate(_))));
}

#[test]
fn block_center_is_the_coordinate() {
    assert_eq!(BlockKey::new(-1, 0, 7).center(), [-1.0, 0.0, 7.0]);
}

#[test]
fn settings_constructors() {
    let colored = BlockSettings::colored([1.0, 0.0, 0.0]);
    assert!(colored.texture.is_none());
    let textured = BlockSettings::textured("stone.png");
    assert_eq!(textured.texture.as_deref(), Some("stone.png"));
    assert_eq!(textured.color, BlockSettings::default().color);
}

#[test]
fn sun_direction_is_normalized() {
    let sun = Sun::new(Vector3::new(0.0, -3.0, 4.0), [1.0, 0.5, 0.0], 2.0);
    assert_abs_diff_eq!(sun.direction().magnitude(), 1.0, epsilon = 1e-6);
    assert_eq!(sun.radiance(), [2.0, 1.0, 0.0]);
}

#[test]
fn zero_sun_direction_points_down() {
    let sun = Sun::new(Vector3::new(0.0, 0.0, 0.0), [1.0; 3], -1.0);
    assert_eq!(sun.direction(), Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(sun.intensity, 0.0);
}

#[test]
fn sun_lights_faces_towards_it() {
    let sun = Sun::new(Vector3::new(0.0, -1.0, 0.0), [1.0; 3], 1.0);
    assert_abs_diff_eq!(sun.diffuse([0.0, 1.0, 0.0]), 1.0);
    assert_eq!(sun.diffuse([0.0, -1.0, 0.0]), 0.0);
    assert_abs_diff_eq!(sun.diffuse([1.0, 0.0, 0.0]), 0.0);
}

#[test]
fn flat_material_samples_white() {
    let material = Material::flat([0.5, 0.5, 0.5]);
    assert!(!material.is_textured());
    assert_eq!(material.sample(0.3, 0.7), [1.0; 3]);
    assert_eq!(material.rgba(), [0.5, 0.5, 0.5, 1.0]);
}

#[test]
fn textured_material_samples_nearest_and_repeats() {
    let mut image = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
    image.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
    let material = Material {
        color: [1.0; 3],
        image: Some(Arc::new(image)),
    };
    assert_eq!(material.sample(0.25, 0.5), [1.0, 0.0, 0.0]);
    assert_eq!(material.sample(0.75, 0.5), [0.0, 0.0, 1.0]);
    assert_eq!(material.sample(1.25, 0.5), [1.0, 0.0, 0.0]);
    assert_eq!(material.sample(-0.25, 0.5), [0.0, 0.0, 1.0]);
}
