//! Line structuring element regression test
//!
//! Tests:
//!   (1) Rasterization of a shallow line
//!   (2) Single point dilation by a line element
//!   (3) Single-pass line opening and closing vs erode + dilate
//!   (4) Boundary override on erosion
//!
//! Run with:
//! ```
//! cargo test -p anchor-morph --test line_reg
//! ```

use anchor_morph::{
    AnchorConfig, Extremum, HistogramStrategy, StructuringElement, apply_along_decomposition,
    build_line, build_ray, close_gray, dilate_gray, erode_gray, open_gray,
};
use anchor_test::{RegParams, brute_force_morph, random_image, render_mask, single_point_image};

#[test]
fn line_reg() {
    let mut rp = RegParams::new("line");
    let config = AnchorConfig::default();

    // ====================================================================
    // Test 1: Rasterization
    // ====================================================================

    eprintln!("  Testing ray along (1, 0.25)");
    let norm = (1.0f64 + 0.0625).sqrt();
    let direction = [1.0 / norm, 0.25 / norm];
    let ray = build_ray(&direction, 100).unwrap();
    rp.compare_values(100.0, ray.len() as f64, 0.0);
    let mut connected = true;
    let mut previous = [0isize, -1];
    for (i, offset) in ray.iter().enumerate() {
        connected &= offset[0] == i as isize;
        connected &= (offset[1] - previous[1]) <= 1 && offset[1] >= previous[1];
        previous = [offset[0], offset[1]];
    }
    record_same(&mut rp, connected, "ray is 8-connected and monotone");
    let last = ray.get(99);
    rp.compare_values(25.0, last[1] as f64, 1.0);

    let line = build_line(&direction, 10).unwrap();
    rp.compare_values(21.0, line.len() as f64, 0.0);
    let symmetric = (0..line.len()).all(|i| {
        let (a, b) = (line.get(i), line.get(line.len() - 1 - i));
        a[0] == -b[0] && a[1] == -b[1]
    });
    record_same(&mut rp, symmetric, "line is symmetric about the center");

    // ====================================================================
    // Test 2: Single point dilation
    // ====================================================================

    eprintln!("  Testing point dilation by a 21-pixel line");
    let se = StructuringElement::line(&[1.0, 0.25], 21).unwrap();
    record_same(&mut rp, se.is_line(), "line element has one segment");
    rp.compare_values(21.0, se.hit_count().unwrap() as f64, 0.0);
    if rp.display() {
        eprintln!("{}", render_mask(&se.mask().unwrap()));
    }
    let point = single_point_image(&[64, 48], &[32, 24], 0u8, 255).unwrap();
    let dilated = dilate_gray(&point, &se, &config).unwrap();
    let lit: Vec<Vec<isize>> = dilated
        .region()
        .indices()
        .filter(|q| dilated.get(q) == Some(255))
        .collect();
    rp.compare_values(21.0, lit.len() as f64, 0.0);
    let spans = lit.iter().all(|q| (q[0] - 32).abs() <= 10 && (q[1] - 24).abs() <= 3);
    record_same(&mut rp, spans, "dilated line stays on the line");
    let mut columns: Vec<isize> = lit.iter().map(|q| q[0]).collect();
    columns.sort_unstable();
    columns.dedup();
    rp.compare_values(21.0, columns.len() as f64, 0.0);

    // Axis-aligned lines match the brute force kernel exactly
    let vertical = StructuringElement::line(&[0.0, 1.0], 9).unwrap();
    let noise = random_image(&[40, 30], 4).unwrap();
    let fast = erode_gray(&noise, &vertical, &config).unwrap();
    let slow = brute_force_morph(&noise, &vertical.mask().unwrap(), false).unwrap();
    rp.compare_images(&fast, &slow);

    // ====================================================================
    // Test 3: Single-pass open/close
    // ====================================================================

    let noise = random_image(&[70, 50], 9).unwrap();
    let lines = [
        ([1.0, 0.25], 21),
        ([1.0, 1.0], 11),
        ([-0.3, 1.0], 15),
        ([1.0, 0.0], 7),
    ];
    for (vector, length) in lines {
        eprintln!("  Testing open/close along {:?}, length {}", vector, length);
        let se = StructuringElement::line(&vector, length).unwrap();

        let opened = open_gray(&noise, &se, &config).unwrap();
        let eroded = erode_gray(&noise, &se, &config).unwrap();
        let two_pass = dilate_gray(&eroded, &se, &config).unwrap();
        rp.compare_images(&opened, &two_pass);

        let closed = close_gray(&noise, &se, &config).unwrap();
        let dilated = dilate_gray(&noise, &se, &config).unwrap();
        let two_pass = erode_gray(&dilated, &se, &config).unwrap();
        rp.compare_images(&closed, &two_pass);

        let map = AnchorConfig::new().with_histogram(HistogramStrategy::Map);
        rp.compare_images(&opened, &open_gray(&noise, &se, &map).unwrap());
    }

    // ====================================================================
    // Test 4: Boundary override
    // ====================================================================

    eprintln!("  Testing erosion with a zero boundary");
    let flat = single_point_image(&[30, 20], &[0, 0], 200u8, 200).unwrap();
    let se = StructuringElement::line(&[1.0, 0.0], 5).unwrap();
    let zero = AnchorConfig::new().with_boundary(0u8);
    let mut out = flat.clone();
    apply_along_decomposition(&flat, &mut out, &se, Extremum::Min, &zero).unwrap();
    let edges_dark = (0..20).all(|y| {
        out.get(&[0, y]) == Some(0)
            && out.get(&[1, y]) == Some(0)
            && out.get(&[2, y]) == Some(200)
            && out.get(&[27, y]) == Some(200)
            && out.get(&[28, y]) == Some(0)
    });
    record_same(&mut rp, edges_dark, "zero boundary erodes the left and right edges");
    let default_erosion = erode_gray(&flat, &se, &config).unwrap();
    record_same(&mut rp, default_erosion.equals(&flat), "default boundary keeps a flat image");

    assert!(rp.cleanup());
}

fn record_same(rp: &mut RegParams, same: bool, what: &str) {
    rp.compare_values(1.0, if same { 1.0 } else { 0.0 }, 0.0);
    if !same {
        eprintln!("    DIFFER: {}", what);
    }
}
