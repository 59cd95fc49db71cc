//! Morphological sequence regression test
//!
//! Tests the gray_morph_sequence interpreter on planar and volume images,
//! including rejection of invalid sequence components.
//!
//! Run with:
//! ```
//! cargo test -p anchor-morph --test morphseq_reg
//! ```

use anchor_morph::{
    AnchorConfig, MorphError, MorphOp, MorphSequence, StructuringElement, close_gray, dilate_gray,
    erode_gray, gray_morph_sequence, open_gray, top_hat_gray,
};
use anchor_test::{RegParams, random_image};

const SEQUENCE1: &str = "O1.3 + C3.1";
const SEQUENCE2: &str = "O3.13 + C5.23";
const SEQUENCE3: &str = "e3.3 + d3.3 + tw5.5";
const SEQUENCE4: &str = "O3.3.5 + C3.5.1";
const BAD_SEQUENCE: &str = "O1.+D8 + E2.4 + e.4 + r25 + y7.3";

#[test]
fn morphseq_reg() {
    let mut rp = RegParams::new("morphseq");
    let config = AnchorConfig::default();
    let pixs = random_image(&[120, 90], 17).unwrap();

    // ====================================================================
    // Test 1: Open then close with thin bricks
    // ====================================================================
    eprintln!("  Testing SEQUENCE1");
    let pix1 = gray_morph_sequence(&pixs, SEQUENCE1).expect("SEQUENCE1");
    let opened = open_gray(&pixs, &StructuringElement::brick(&[0, 1]).unwrap(), &config).unwrap();
    let pix2 = close_gray(&opened, &StructuringElement::brick(&[1, 0]).unwrap(), &config).unwrap();
    rp.compare_images(&pix1, &pix2);

    // ====================================================================
    // Test 2: Larger bricks
    // ====================================================================
    eprintln!("  Testing SEQUENCE2");
    let pix1 = gray_morph_sequence(&pixs, SEQUENCE2).expect("SEQUENCE2");
    let opened = open_gray(&pixs, &StructuringElement::brick(&[1, 6]).unwrap(), &config).unwrap();
    let pix2 = close_gray(&opened, &StructuringElement::brick(&[2, 11]).unwrap(), &config).unwrap();
    rp.compare_images(&pix1, &pix2);

    // ====================================================================
    // Test 3: Erode, dilate, white tophat
    // ====================================================================
    eprintln!("  Testing SEQUENCE3");
    let pix1 = gray_morph_sequence(&pixs, SEQUENCE3).expect("SEQUENCE3");
    let small = StructuringElement::brick(&[1, 1]).unwrap();
    let eroded = erode_gray(&pixs, &small, &config).unwrap();
    let dilated = dilate_gray(&eroded, &small, &config).unwrap();
    let pix2 = top_hat_gray(&dilated, &StructuringElement::brick(&[2, 2]).unwrap(), &config)
        .unwrap();
    rp.compare_images(&pix1, &pix2);

    // ====================================================================
    // Test 4: Volume sequence
    // ====================================================================
    eprintln!("  Testing SEQUENCE4 on a volume");
    let volume = random_image(&[24, 20, 16], 23).unwrap();
    let pix1 = gray_morph_sequence(&volume, SEQUENCE4).expect("SEQUENCE4");
    let opened = open_gray(&volume, &StructuringElement::brick(&[1, 1, 2]).unwrap(), &config)
        .unwrap();
    let pix2 = close_gray(&opened, &StructuringElement::brick(&[1, 2, 0]).unwrap(), &config)
        .unwrap();
    rp.compare_images(&pix1, &pix2);

    // A planar sequence does not apply to a volume
    let wrong_axes = gray_morph_sequence(&volume, SEQUENCE1);
    rp.compare_values(
        1.0,
        if matches!(wrong_axes, Err(MorphError::InvalidSequence(_))) {
            1.0
        } else {
            0.0
        },
        0.0,
    );

    // ====================================================================
    // Test 5: Parsing
    // ====================================================================
    eprintln!("  Testing parsed operations");
    let seq = MorphSequence::parse(SEQUENCE3).unwrap();
    rp.compare_values(3.0, seq.len() as f64, 0.0);
    let expected = [
        MorphOp::Erode { sizes: vec![3, 3] },
        MorphOp::Dilate { sizes: vec![3, 3] },
        MorphOp::Tophat {
            white: true,
            sizes: vec![5, 5],
        },
    ];
    let same = seq.ops() == expected.as_slice();
    rp.compare_values(1.0, if same { 1.0 } else { 0.0 }, 0.0);

    // ====================================================================
    // Test 6: Every component of the bad sequence is rejected
    // ====================================================================
    eprintln!("  Testing rejection of invalid components");
    let mut rejected = 0;
    for part in BAD_SEQUENCE.split('+') {
        match MorphSequence::parse(part) {
            Err(e) => {
                eprintln!("    rejected '{}': {}", part.trim(), e);
                rejected += 1;
            }
            Ok(_) => eprintln!("    accepted '{}'", part.trim()),
        }
    }
    rp.compare_values(6.0, rejected as f64, 0.0);
    rp.compare_values(
        1.0,
        if gray_morph_sequence(&pixs, BAD_SEQUENCE).is_err() {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    for bad in ["", "   ", "d3.3 + ", "t3.3", "g3.x"] {
        let ok = MorphSequence::parse(bad).is_err();
        rp.compare_values(1.0, if ok { 1.0 } else { 0.0 }, 0.0);
        if !ok {
            eprintln!("    accepted bad sequence '{}'", bad);
        }
    }

    assert!(rp.cleanup());
}
