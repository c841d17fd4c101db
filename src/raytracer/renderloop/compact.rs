use crate::raytracer::ray::{Intersection, PathSegment};

/// Moves every element satisfying `pred` to the front, keeping the relative
/// order on both sides. Returns the number of elements that satisfied `pred`.
///
/// `scratch` holds the rejected elements while the front is rebuilt; it is
/// cleared on entry and can be reused between calls.
pub fn stable_partition<T, P>(items: &mut [T], scratch: &mut Vec<T>, mut pred: P) -> usize
where
    T: Clone,
    P: FnMut(&T) -> bool,
{
    scratch.clear();
    let mut write = 0;
    for read in 0..items.len() {
        if pred(&items[read]) {
            if write != read {
                items[write] = items[read].clone();
            }
            write += 1;
        } else {
            scratch.push(items[read].clone());
        }
    }
    items[write..].clone_from_slice(scratch);
    write
}

/// Reorders paths and their intersections together so equal material ids are
/// contiguous. The sort is stable, misses sort last.
pub fn sort_by_material(
    paths: &mut [PathSegment],
    intersections: &mut [Intersection],
    order: &mut Vec<u32>,
    path_scratch: &mut Vec<PathSegment>,
    isect_scratch: &mut Vec<Intersection>,
) {
    debug_assert_eq!(paths.len(), intersections.len());

    order.clear();
    order.extend(0..paths.len() as u32);
    order.sort_by_key(|&i| intersections[i as usize].material_id);

    path_scratch.clear();
    path_scratch.extend(order.iter().map(|&i| paths[i as usize]));
    isect_scratch.clear();
    isect_scratch.extend(order.iter().map(|&i| intersections[i as usize]));

    paths.copy_from_slice(path_scratch);
    intersections.copy_from_slice(isect_scratch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::ray::Ray;
    use glam::Vec3;

    #[test]
    fn test_partition_is_stable() {
        let mut items: Vec<u32> = vec![5, 2, 8, 1, 9, 4, 7, 6, 3, 0];
        let mut scratch = Vec::new();
        let count = stable_partition(&mut items, &mut scratch, |&x| x % 2 == 0);
        assert_eq!(count, 5);
        assert_eq!(&items[..count], &[2, 8, 4, 6, 0]);
        assert_eq!(&items[count..], &[5, 1, 9, 7, 3]);
    }

    #[test]
    fn test_partition_edge_cases() {
        let mut scratch = Vec::new();

        let mut empty: Vec<u32> = Vec::new();
        assert_eq!(stable_partition(&mut empty, &mut scratch, |_| true), 0);

        let mut all = vec![1, 2, 3];
        assert_eq!(stable_partition(&mut all, &mut scratch, |_| true), 3);
        assert_eq!(all, vec![1, 2, 3]);

        let mut none = vec![1, 2, 3];
        assert_eq!(stable_partition(&mut none, &mut scratch, |_| false), 0);
        assert_eq!(none, vec![1, 2, 3]);
    }

    #[test]
    fn test_partition_pseudo_random_inputs() {
        let mut scratch = Vec::new();
        let mut state = 0x1234_5678u32;
        for len in [1usize, 7, 64, 513] {
            let items: Vec<(u32, u32)> = (0..len as u32)
                .map(|i| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    (i, state % 3)
                })
                .collect();
            let mut partitioned = items.clone();
            let count = stable_partition(&mut partitioned, &mut scratch, |&(_, r)| r > 0);

            let expected: Vec<_> = items.iter().filter(|(_, r)| *r > 0).copied().collect();
            assert_eq!(count, expected.len());
            assert_eq!(&partitioned[..count], &expected[..]);
        }
    }

    #[test]
    fn test_paths_by_remaining_bounces() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut paths: Vec<PathSegment> = (0..6).map(|i| PathSegment::new(ray, i, i % 3)).collect();
        let mut scratch = Vec::new();
        let alive = stable_partition(&mut paths, &mut scratch, PathSegment::is_alive);
        assert_eq!(alive, 4);
        let order: Vec<u32> = paths.iter().map(|p| p.pixel_index).collect();
        assert_eq!(order, vec![1, 2, 4, 5, 0, 3]);
    }

    #[test]
    fn test_sort_by_material_keeps_pairs() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut paths: Vec<PathSegment> = (0..5).map(|i| PathSegment::new(ray, i, 1)).collect();
        let mut isects: Vec<Intersection> = [2u32, 0, 2, 1, 0]
            .iter()
            .map(|&m| Intersection {
                t: 1.0,
                material_id: m,
                ..Intersection::MISS
            })
            .collect();
        isects[1] = Intersection::MISS;

        let (mut order, mut path_tmp, mut isect_tmp) = (Vec::new(), Vec::new(), Vec::new());
        sort_by_material(&mut paths, &mut isects, &mut order, &mut path_tmp, &mut isect_tmp);

        let pixels: Vec<u32> = paths.iter().map(|p| p.pixel_index).collect();
        let materials: Vec<u32> = isects.iter().map(|i| i.material_id).collect();
        assert_eq!(pixels, vec![4, 3, 0, 2, 1]);
        assert_eq!(materials, vec![0, 1, 2, 2, u32::MAX]);
    }
}
