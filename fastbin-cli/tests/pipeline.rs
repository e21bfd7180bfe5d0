use fastbin_cli::fastbin_core::{DescriptorMatcher, Feature2D, Image, Keypoint};
use fastbin_cli::{PipelineBuilder, PipelineConfig};

const SIZE: usize = 96;
const SHIFT: (usize, usize) = (5, 3);

/// Tiled scene: every 24x24 cell holds a bright 5x5 block at its centre and
/// a dimmer 3x3 marker whose position varies from cell to cell.
fn scene(x: i64, y: i64) -> u8 {
    let (i, j) = (x.div_euclid(24), y.div_euclid(24));
    let (lx, ly) = (x.rem_euclid(24), y.rem_euclid(24));

    if (10..=14).contains(&lx) && (10..=14).contains(&ly) {
        return 200;
    }

    let h = (i * 7 + j * 13).rem_euclid(12);
    let mx = 3 + (h % 6) * 3;
    let my = if h < 6 { 3 } else { 20 };
    if (mx - 1..=mx + 1).contains(&lx) && (my - 1..=my + 1).contains(&ly) {
        return 120;
    }

    40
}

fn render(dx: usize, dy: usize) -> Image {
    let data = (0..SIZE * SIZE)
        .map(|i| {
            let (x, y) = ((i % SIZE) as i64, (i / SIZE) as i64);
            scene(x - dx as i64, y - dy as i64)
        })
        .collect();
    Image::gray(SIZE, SIZE, data).unwrap()
}

/// Keypoints whose whole neighbourhood stays clear of the border in both the
/// original and the shifted image.
fn is_interior(kp: &Keypoint) -> bool {
    (14..=SIZE - 15 - SHIFT.0).contains(&kp.x) && (14..=SIZE - 15 - SHIFT.1).contains(&kp.y)
}

#[test]
fn shifted_scene_keeps_keypoints_and_descriptors() {
    let (features, _) = PipelineBuilder::new().seed(2024).build().unwrap();
    let (kps_a, desc_a) = features.detect_and_compute(&render(0, 0)).unwrap();
    let (kps_b, desc_b) = features.detect_and_compute(&render(SHIFT.0, SHIFT.1)).unwrap();

    let interior: Vec<usize> = (0..kps_a.len()).filter(|&i| is_interior(&kps_a[i])).collect();
    assert!(interior.len() >= 4);
    assert!(kps_a.contains(&Keypoint::new(36, 36)));

    for &i in &interior {
        let moved = Keypoint::new(kps_a[i].x + SHIFT.0, kps_a[i].y + SHIFT.1);
        let j = kps_b
            .iter()
            .position(|kp| *kp == moved)
            .unwrap_or_else(|| panic!("{:?} lost after shift", kps_a[i]));
        assert_eq!(desc_a[i], desc_b[j]);
    }
}

#[test]
fn shifted_scene_matches_exactly() {
    let (features, mut matcher) = PipelineConfig::strict_matching().to_builder().seed(8).build().unwrap();
    let (kps_a, desc_a) = features.detect_and_compute(&render(0, 0)).unwrap();
    let (_, desc_b) = features.detect_and_compute(&render(SHIFT.0, SHIFT.1)).unwrap();

    let query: Vec<_> = kps_a
        .iter()
        .zip(&desc_a)
        .filter(|(kp, _)| is_interior(kp))
        .map(|(_, d)| *d)
        .collect();

    matcher.add(desc_b.clone());
    let matches = matcher.match_descriptors(&query);
    assert_eq!(matches.len(), query.len());

    for (q, m) in matches.iter().enumerate() {
        let m = m.unwrap_or_else(|| panic!("query {} unmatched", q));
        assert_eq!(m.query_idx, q);
        assert_eq!(m.distance, 0);
        assert_eq!(desc_b[m.train_idx], query[q]);
    }
}

#[test]
fn self_match_prefers_first_identical_descriptor() {
    let (features, mut matcher) = PipelineBuilder::new().seed(3).build().unwrap();
    let (_, desc) = features.detect_and_compute(&render(0, 0)).unwrap();
    assert!(!desc.is_empty());

    matcher.add(desc.clone());
    for (q, m) in matcher.match_descriptors(&desc).into_iter().enumerate() {
        let m = m.unwrap();
        assert_eq!(m.distance, 0);
        assert!(m.train_idx <= q);
        assert_eq!(desc[m.train_idx], desc[q]);
    }
}

#[test]
fn same_seed_gives_comparable_pipelines() {
    let cfg = PipelineConfig::reproducible(99);
    let (first, _) = cfg.build().unwrap();
    let (second, _) = cfg.build().unwrap();

    let img = render(0, 0);
    assert_eq!(
        first.detect_and_compute(&img).unwrap(),
        second.detect_and_compute(&img).unwrap()
    );
}

#[test]
fn unmatched_queries_stay_positional() {
    let (features, mut matcher) = PipelineBuilder::new().seed(5).build().unwrap();
    let (_, desc) = features.detect_and_compute(&render(0, 0)).unwrap();

    assert!(matcher.match_descriptors(&desc).iter().all(Option::is_none));

    matcher.add(Vec::new());
    let matches = matcher.match_descriptors(&desc);
    assert_eq!(matches.len(), desc.len());
    assert!(matches.iter().all(Option::is_none));
}

#[test]
fn flat_and_empty_images() {
    let (features, mut matcher) = PipelineBuilder::new().build().unwrap();

    let (kps, desc) = features.detect_and_compute(&Image::filled(64, 48, 128).unwrap()).unwrap();
    assert!(kps.is_empty() && desc.is_empty());

    let empty = Image::rgb(0, 0, Vec::new()).unwrap();
    let (kps, desc) = features.detect_and_compute(&empty).unwrap();
    assert!(kps.is_empty() && desc.is_empty());

    matcher.add(desc);
    assert!(matcher.match_descriptors(&[]).is_empty());
}
