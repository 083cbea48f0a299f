use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::labels::ClassList;
use crate::types::{ImageAnnotation, Shape, JSON_EXTENSION, LABEL_EXTENSION};
use crate::utils::{create_progress_bar, list_files_with_extension, read_and_parse_json};

const CIRCLE_POINTS: usize = 12;

/// How labels missing from the class list are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownLabelPolicy {
    /// The class list was derived from the data, so a miss is an error.
    #[default]
    Fail,
    /// The class list was given by the user; shapes outside it are dropped.
    Skip,
}

/// Convert every JSON file in `dirname` into a `.txt` label file with the same stem.
/// Returns the number of label files written.
pub fn convert_directory(
    dirname: &Path,
    class_list: &ClassList,
    policy: UnknownLabelPolicy,
) -> Result<usize> {
    let json_files = list_files_with_extension(dirname, JSON_EXTENSION)?;
    let pb = create_progress_bar(json_files.len() as u64, "Convert");

    for json_path in &json_files {
        let annotation = read_and_parse_json(json_path)?;
        let yolo_data = convert_to_yolo_format(json_path, &annotation, class_list, policy)?;

        let label_path = json_path.with_extension(LABEL_EXTENSION);
        let mut writer =
            BufWriter::new(File::create(&label_path).map_err(|e| Error::io(&label_path, e))?);
        writer
            .write_all(yolo_data.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| Error::io(&label_path, e))?;
        pb.inc(1);
    }
    pb.finish_with_message("Conversion complete");

    info!("Wrote {} label files.", json_files.len());
    Ok(json_files.len())
}

/// Convert an annotation to YOLO segmentation lines, one per shape.
pub fn convert_to_yolo_format(
    json_path: &Path,
    annotation: &ImageAnnotation,
    class_list: &ClassList,
    policy: UnknownLabelPolicy,
) -> Result<String> {
    if !is_valid_dimension(annotation.image_width) || !is_valid_dimension(annotation.image_height) {
        return Err(Error::InvalidImageSize {
            path: json_path.to_path_buf(),
            width: annotation.image_width,
            height: annotation.image_height,
        });
    }

    let mut yolo_data = String::with_capacity(annotation.shapes.len() * 64);

    for shape in &annotation.shapes {
        let class_id = match (class_list.index_of(&shape.label), policy) {
            (Some(class_id), _) => class_id,
            (None, UnknownLabelPolicy::Skip) => {
                warn!(
                    "Skipping shape with label '{}' in {}: not in the label list",
                    shape.label,
                    json_path.display()
                );
                continue;
            }
            (None, UnknownLabelPolicy::Fail) => {
                return Err(Error::UnknownLabel {
                    path: json_path.to_path_buf(),
                    label: shape.label.clone(),
                })
            }
        };

        yolo_data.push_str(&class_id.to_string());
        process_polygon_shape(&mut yolo_data, annotation, shape);
        yolo_data.push('\n');
    }

    Ok(yolo_data)
}

/// Append the normalized points of a shape to a label line.
pub fn process_polygon_shape(yolo_data: &mut String, annotation: &ImageAnnotation, shape: &Shape) {
    for (x, y) in shape_points(shape) {
        let (x_norm, y_norm) = normalize_point(
            (x, y),
            annotation.image_width,
            annotation.image_height,
        );
        yolo_data.push_str(&format!(" {:?} {:?}", x_norm, y_norm));
    }
}

/// Outline of a shape in pixel coordinates.
///
/// Rectangles are stored as two corners and circles as center plus rim point;
/// both are expanded into polygons. Anything else is taken as-is.
pub fn shape_points(shape: &Shape) -> Vec<(f64, f64)> {
    match (shape.shape_type.as_deref(), shape.points.as_slice()) {
        (Some("rectangle"), &[(x1, y1), (x2, y2)]) => vec![(x1, y1), (x2, y1), (x2, y2), (x1, y2)],
        (Some("circle"), &[(cx, cy), (px, py)]) => {
            let radius = ((cx - px).powi(2) + (cy - py).powi(2)).sqrt();
            (0..CIRCLE_POINTS)
                .map(|i| {
                    let angle = 2.0 * std::f64::consts::PI * i as f64 / CIRCLE_POINTS as f64;
                    (cx + radius * angle.cos(), cy + radius * angle.sin())
                })
                .collect()
        }
        _ => shape.points.clone(),
    }
}

fn is_valid_dimension(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

/// Scale a pixel coordinate into [0, 1] by the image size, clamping out-of-bounds points.
/// Adding `0.0` turns a clamped `-0.0` into `0.0`.
pub fn normalize_point((x, y): (f64, f64), width: f64, height: f64) -> (f64, f64) {
    (
        (x / width).clamp(0.0, 1.0) + 0.0,
        (y / height).clamp(0.0, 1.0) + 0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn shape(label: &str, points: Vec<(f64, f64)>, shape_type: Option<&str>) -> Shape {
        Shape {
            label: label.to_string(),
            points,
            group_id: None,
            shape_type: shape_type.map(str::to_string),
            description: None,
        }
    }

    fn annotation(width: f64, height: f64, shapes: Vec<Shape>) -> ImageAnnotation {
        ImageAnnotation {
            version: None,
            flags: None,
            shapes,
            image_path: None,
            image_height: height,
            image_width: width,
        }
    }

    #[test]
    fn test_normalize_point_clamps() {
        assert_eq!(normalize_point((50.0, 100.0), 100.0, 200.0), (0.5, 0.5));
        assert_eq!(normalize_point((150.0, 250.0), 100.0, 200.0), (1.0, 1.0));
        assert_eq!(normalize_point((-5.0, -1e9), 100.0, 200.0), (0.0, 0.0));
    }

    #[test]
    fn test_negative_zero_is_written_as_zero() {
        let (x_norm, _) = normalize_point((-0.0, 100.0), 100.0, 200.0);
        assert!(x_norm.is_sign_positive());

        let annotation = annotation(100.0, 200.0, vec![shape("a", vec![(-0.0, 100.0)], None)]);
        let class_list = ClassList::from_labels(&["a"]);
        let yolo_data = convert_to_yolo_format(
            Path::new("a.json"),
            &annotation,
            &class_list,
            UnknownLabelPolicy::Fail,
        )
        .unwrap();

        assert_eq!(yolo_data, "0 0.0 0.5\n");
    }

    #[test]
    fn test_float_image_size_converts() {
        let annotation: ImageAnnotation = serde_json::from_str(
            r#"{"imageWidth":100.0,"imageHeight":200.5,"shapes":[{"label":"a","points":[[50,401]]}]}"#,
        )
        .unwrap();
        let class_list = ClassList::from_labels(&["a"]);

        let yolo_data = convert_to_yolo_format(
            Path::new("a.json"),
            &annotation,
            &class_list,
            UnknownLabelPolicy::Fail,
        )
        .unwrap();

        assert_eq!(yolo_data, "0 0.5 1.0\n");
    }

    #[test]
    fn test_non_positive_image_size_is_rejected() {
        let class_list = ClassList::from_labels(&["a"]);
        for (width, height) in [(-1.0, 10.0), (10.0, f64::NAN), (f64::INFINITY, 10.0)] {
            let annotation = annotation(width, height, vec![shape("a", vec![(1.0, 1.0)], None)]);
            let result = convert_to_yolo_format(
                Path::new("a.json"),
                &annotation,
                &class_list,
                UnknownLabelPolicy::Fail,
            );
            assert!(matches!(result, Err(Error::InvalidImageSize { .. })));
        }
    }

    #[test]
    fn test_convert_to_yolo_format() {
        let annotation = annotation(
            100.0,
            200.0,
            vec![shape("cat", vec![(50.0, 100.0), (150.0, 250.0)], None)],
        );
        let class_list = ClassList::from_labels(&["cat"]);

        let yolo_data = convert_to_yolo_format(
            Path::new("a.json"),
            &annotation,
            &class_list,
            UnknownLabelPolicy::Fail,
        )
        .unwrap();

        assert_eq!(yolo_data, "0 0.5 0.5 1.0 1.0\n");
    }

    #[test]
    fn test_one_line_per_shape() {
        let annotation = annotation(
            10.0,
            10.0,
            vec![
                shape("a", vec![(1.0, 1.0), (2.0, 2.0), (3.0, 1.0)], Some("polygon")),
                shape("b", vec![(0.0, 0.0)], None),
                shape("a", vec![], None),
            ],
        );
        let class_list = ClassList::from_labels(&["a", "b"]);

        let yolo_data = convert_to_yolo_format(
            Path::new("a.json"),
            &annotation,
            &class_list,
            UnknownLabelPolicy::Fail,
        )
        .unwrap();
        let lines: Vec<&str> = yolo_data.lines().collect();

        assert_eq!(lines, vec!["0 0.1 0.1 0.2 0.2 0.3 0.1", "1 0.0 0.0", "0"]);
    }

    #[test]
    fn test_rectangle_expands_to_four_corners() {
        let annotation = annotation(
            100.0,
            100.0,
            vec![shape("box", vec![(10.0, 20.0), (30.0, 40.0)], Some("rectangle"))],
        );
        let class_list = ClassList::from_labels(&["box"]);

        let yolo_data = convert_to_yolo_format(
            Path::new("a.json"),
            &annotation,
            &class_list,
            UnknownLabelPolicy::Fail,
        )
        .unwrap();

        assert_eq!(yolo_data, "0 0.1 0.2 0.3 0.2 0.3 0.4 0.1 0.4\n");
    }

    #[test]
    fn test_circle_expands_to_polygon() {
        let circle = shape("ball", vec![(50.0, 50.0), (60.0, 50.0)], Some("circle"));
        let points = shape_points(&circle);

        assert_eq!(points.len(), CIRCLE_POINTS);
        for (x, y) in points {
            let radius = ((x - 50.0).powi(2) + (y - 50.0).powi(2)).sqrt();
            assert!((radius - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_coordinates_stay_in_unit_range() {
        let annotation = annotation(
            64.0,
            48.0,
            vec![shape(
                "x",
                vec![(-100.0, 20.0), (1000.0, 47.9), (32.0, 480.0), (f64::MAX, f64::MIN)],
                None,
            )],
        );
        let class_list = ClassList::from_labels(&["x"]);

        let yolo_data = convert_to_yolo_format(
            Path::new("a.json"),
            &annotation,
            &class_list,
            UnknownLabelPolicy::Fail,
        )
        .unwrap();

        for value in yolo_data.split_whitespace().skip(1) {
            let value: f64 = value.parse().unwrap();
            assert!((0.0..=1.0).contains(&value), "{} out of range", value);
        }
    }

    #[test]
    fn test_zero_image_size_is_rejected() {
        let annotation = annotation(0.0, 10.0, vec![shape("a", vec![(1.0, 1.0)], None)]);
        let class_list = ClassList::from_labels(&["a"]);

        let result = convert_to_yolo_format(
            Path::new("zero.json"),
            &annotation,
            &class_list,
            UnknownLabelPolicy::Fail,
        );

        match result {
            Err(Error::InvalidImageSize { path, width, height }) => {
                assert_eq!(path, PathBuf::from("zero.json"));
                assert_eq!((width, height), (0.0, 10.0));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_label_policy() {
        let annotation = annotation(
            10.0,
            10.0,
            vec![
                shape("known", vec![(5.0, 5.0)], None),
                shape("other", vec![(5.0, 5.0)], None),
            ],
        );
        let class_list = ClassList::from_labels(&["known"]);

        let skipped = convert_to_yolo_format(
            Path::new("a.json"),
            &annotation,
            &class_list,
            UnknownLabelPolicy::Skip,
        )
        .unwrap();
        assert_eq!(skipped, "0 0.5 0.5\n");

        let failed = convert_to_yolo_format(
            Path::new("a.json"),
            &annotation,
            &class_list,
            UnknownLabelPolicy::Fail,
        );
        assert!(matches!(failed, Err(Error::UnknownLabel { label, .. }) if label == "other"));
    }
}
