use log::{debug, info};

use crate::models::ClusterConfig;
use crate::processing::region::Rectangle;

/// Consolidates detected text regions into covering blocks.
pub struct RegionClusterer;

impl RegionClusterer {
    /// Merge rectangles in place until no pair is left that overlaps or
    /// sits within the given thresholds of each other.
    ///
    /// Overlapping pairs (which includes every containing pair) are collapsed
    /// to a fixpoint first, proximity second. A proximity merge can grow a
    /// block over a leftover region, so both passes repeat until neither
    /// merges anything. Each round evaluates every pair of the live set,
    /// sorted by top-left corner, and merges the qualifying pairs whose
    /// members are both still live.
    pub fn cluster(rects: &mut Vec<Rectangle>, v_thresh: u32, h_thresh: u32) {
        let before = rects.len();

        loop {
            let mut merges = Self::collapse(rects, |a, b| a.overlap(b));
            debug!("{} regions left after overlap pass", rects.len());

            merges += Self::collapse(rects, |a, b| a.near(b, v_thresh, h_thresh));
            debug!("{} regions left after proximity pass", rects.len());

            if merges == 0 {
                break;
            }
        }

        info!(
            "Clustered {} regions into {} blocks (v_thresh={}, h_thresh={})",
            before,
            rects.len(),
            v_thresh,
            h_thresh
        );
    }

    /// Returns the number of merges performed.
    fn collapse<F>(rects: &mut Vec<Rectangle>, qualifies: F) -> usize
    where
        F: Fn(&Rectangle, &Rectangle) -> bool,
    {
        let mut merges = 0;
        loop {
            rects.sort_by_key(|r| (r.x, r.y, r.width, r.height));

            let n = rects.len();
            let pairs: Vec<(usize, usize)> = (0..n)
                .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
                .filter(|&(i, j)| qualifies(&rects[i], &rects[j]))
                .collect();

            if pairs.is_empty() {
                return merges;
            }

            let mut live: Vec<Option<Rectangle>> = rects.drain(..).map(Some).collect();
            let mut merged = Vec::new();
            for (i, j) in pairs {
                if let (Some(a), Some(b)) = (live[i], live[j]) {
                    merged.push(a.merge(&b));
                    live[i] = None;
                    live[j] = None;
                }
            }

            merges += merged.len();
            rects.extend(live.into_iter().flatten());
            rects.extend(merged);
        }
    }
}

/// Turns raw detector output for one image into padded crop regions.
pub struct RegionPlanner {
    config: ClusterConfig,
}

impl RegionPlanner {
    pub fn new(config: ClusterConfig) -> Self {
        RegionPlanner { config }
    }

    /// Vertical and horizontal merge thresholds for an image of this size.
    pub fn thresholds(&self, image_width: u32, image_height: u32) -> (u32, u32) {
        let ratio = self.config.threshold_ratio;
        let v = (image_height as f64 * ratio).round_ties_even() as u32;
        let h = (image_width as f64 * ratio).round_ties_even() as u32;
        (v, h)
    }

    /// Drop degenerate boxes, cluster the rest and pad each block for cropping.
    pub fn plan(&self, detections: &[Rectangle], image_width: u32, image_height: u32) -> Vec<Rectangle> {
        let mut rects: Vec<Rectangle> = detections
            .iter()
            .filter(|r| r.diagonal() >= self.config.min_diagonal)
            .copied()
            .collect();

        let dropped = detections.len() - rects.len();
        if dropped > 0 {
            debug!("Dropped {} degenerate detections", dropped);
        }

        let (v_thresh, h_thresh) = self.thresholds(image_width, image_height);
        RegionClusterer::cluster(&mut rects, v_thresh, h_thresh);

        let factor = self.config.scale_factor;
        rects
            .iter()
            .map(|r| r.scale(factor, factor, image_width, image_height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_stays_empty() {
        let mut rects = Vec::new();
        RegionClusterer::cluster(&mut rects, 10, 10);
        assert!(rects.is_empty());
    }

    #[test]
    fn nested_regions_collapse_to_one() {
        let a = Rectangle::new(0, 0, 100, 50);
        let b = Rectangle::new(10, 5, 80, 40);
        let c = Rectangle::new(20, 10, 70, 35);
        let mut rects = vec![c, a, b];

        RegionClusterer::cluster(&mut rects, 1, 1);

        assert_eq!(rects, vec![Rectangle::new(0, 0, 100, 50)]);
    }

    #[test]
    fn partly_overlapping_regions_collapse_to_one() {
        let mut rects = vec![
            Rectangle::new(0, 0, 10, 10),
            Rectangle::new(5, 5, 10, 10),
            Rectangle::new(2, 8, 10, 10),
        ];

        RegionClusterer::cluster(&mut rects, 1, 1);

        assert_eq!(rects, vec![Rectangle::new(0, 0, 15, 18)]);
    }

    #[test]
    fn touching_regions_are_not_overlap_merged() {
        // shared edge, no area in common
        let mut rects = vec![Rectangle::new(0, 0, 10, 10), Rectangle::new(10, 0, 10, 10)];
        RegionClusterer::cluster(&mut rects, 0, 0);
        assert_eq!(rects.len(), 2);
    }

    #[test]
    fn block_grown_by_proximity_absorbs_enclosed_region() {
        let mut rects = vec![
            Rectangle::new(0, 0, 100, 10),
            Rectangle::new(0, 15, 100, 10),
            Rectangle::new(40, 8, 20, 9),
        ];

        RegionClusterer::cluster(&mut rects, 10, 5);

        assert_eq!(rects, vec![Rectangle::new(0, 0, 100, 25)]);

        // fragment in the gap between two lines touches neither of them
        let mut rects = vec![
            Rectangle::new(0, 0, 100, 10),
            Rectangle::new(0, 15, 100, 10),
            Rectangle::new(40, 11, 20, 3),
        ];

        RegionClusterer::cluster(&mut rects, 10, 5);

        assert_eq!(rects, vec![Rectangle::new(0, 0, 100, 25)]);
    }

    #[test]
    fn words_on_one_line_become_a_block() {
        let mut rects = vec![
            Rectangle::new(0, 100, 60, 20),
            Rectangle::new(70, 101, 40, 20),
            Rectangle::new(118, 99, 80, 21),
            // separate line far below
            Rectangle::new(0, 300, 60, 20),
        ];

        RegionClusterer::cluster(&mut rects, 5, 15);

        assert_eq!(
            rects,
            vec![Rectangle::new(0, 99, 198, 22), Rectangle::new(0, 300, 60, 20)]
        );
    }

    #[test]
    fn result_has_no_containing_pair() {
        let mut rects = vec![
            Rectangle::new(0, 0, 30, 30),
            Rectangle::new(10, 10, 5, 5),
            Rectangle::new(12, 12, 5, 5),
            Rectangle::new(200, 200, 30, 10),
            Rectangle::new(205, 202, 10, 5),
            Rectangle::new(500, 0, 10, 10),
        ];
        let input_len = rects.len();

        RegionClusterer::cluster(&mut rects, 2, 2);

        assert!(rects.len() <= input_len);
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                assert!(!a.contains(b), "{:?} still contains {:?}", a, b);
            }
        }
        assert_eq!(rects.len(), 3);
    }

    #[test]
    fn identical_duplicates_merge() {
        let r = Rectangle::new(5, 5, 40, 10);
        let mut rects = vec![r, r, r];
        RegionClusterer::cluster(&mut rects, 1, 1);
        assert_eq!(rects, vec![r]);
    }

    #[test]
    fn planner_filters_clusters_and_pads() {
        let planner = RegionPlanner::new(ClusterConfig::default());
        assert_eq!(planner.thresholds(1000, 600), (30, 50));

        let detections = vec![
            Rectangle::new(100, 100, 100, 20),
            Rectangle::new(110, 105, 20, 10),
            // degenerate, diagonal under five pixels
            Rectangle::new(400, 400, 2, 3),
        ];

        let crops = planner.plan(&detections, 1000, 600);

        assert_eq!(crops, vec![Rectangle::new(92, 98, 115, 23)]);
    }
}
