mod common;

use std::fs;

use pdfsplit::types::PartitionStrategy;
use pdfsplit::{ImageStatus, SplitOutcome, SplitParams, process_directory_to_path, split_image_file};

use common::{file_names, quad_squares, save_png, squares_image};

#[test]
fn quad_squares_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_png(&quad_squares(), dir.path(), "quad.png");
    let out = dir.path().join("split_quad");

    let outcome = split_image_file(&input, &out, &SplitParams::with_count(4)).unwrap();
    let SplitOutcome::Split(files) = outcome else {
        panic!("expected a split, got {:?}", outcome);
    };
    assert_eq!(
        file_names(&files),
        vec!["subimg_1.jpg", "subimg_2.jpg", "subimg_3.jpg", "subimg_4.jpg"]
    );

    for path in &files {
        let tile = image::open(path).unwrap().to_rgb8();
        assert_eq!(tile.dimensions(), (150, 150));
        // trimmed tight around a black square
        assert!(tile.get_pixel(75, 75).0.iter().all(|&v| v < 40));
    }
}

#[test]
fn ungridable_image_is_skipped_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_png(&squares_image(300, 199, 1, 1, 100), dir.path(), "odd.png");
    let out = dir.path().join("split_odd");

    let outcome = split_image_file(&input, &out, &SplitParams::with_count(8)).unwrap();
    assert!(matches!(outcome, SplitOutcome::Skipped { .. }));
    assert!(!out.exists());
}

#[test]
fn contour_strategy_finds_separate_figures() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_png(&squares_image(400, 800, 4, 2, 150), dir.path(), "eight.png");
    let out = dir.path().join("split_eight");
    let params = SplitParams {
        strategy: PartitionStrategy::Contour,
        ..SplitParams::with_count(8)
    };

    let SplitOutcome::Split(files) = split_image_file(&input, &out, &params).unwrap() else {
        panic!("contour strategy refused eight separated squares");
    };
    assert_eq!(files.len(), 8);
}

#[test]
fn directory_batch_reports_every_image() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir_all(&input_dir).unwrap();

    save_png(&quad_squares(), &input_dir, "good.png");
    save_png(&squares_image(400, 399, 2, 2, 150), &input_dir, "ungridable.png");
    fs::write(input_dir.join("broken.jpg"), b"definitely not a jpeg").unwrap();
    fs::write(input_dir.join("notes.txt"), b"ignored").unwrap();

    let report = process_directory_to_path(&input_dir, &output_dir, &SplitParams::with_count(4)).unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!((report.split, report.skipped, report.errors), (1, 1, 1));
    assert_eq!(report.subimages, 4);

    let names: Vec<_> = report.images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["broken.jpg", "good.png", "ungridable.png"]);
    assert!(matches!(report.images[0].status, ImageStatus::Failed { .. }));
    assert_eq!(report.images[1].status, ImageStatus::Split { count: 4 });
    assert!(matches!(report.images[2].status, ImageStatus::Skipped { .. }));

    assert!(output_dir.join("split_good").join("subimg_4.jpg").is_file());
    assert!(!output_dir.join("split_ungridable").exists());
}

#[test]
fn directory_batch_rejects_invalid_count() {
    let dir = tempfile::tempdir().unwrap();
    let err = process_directory_to_path(dir.path(), &dir.path().join("out"), &SplitParams::with_count(101));
    assert!(err.is_err());
}
