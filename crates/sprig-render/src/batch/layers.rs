//! Per-layer quad buckets.

use super::quad::Quad;
use super::vertex::Vertex;

/// Number of layers a batch can stack. Layer 0 is drawn first (furthest back).
pub const MAX_LAYERS: usize = 16;

/// One bucket of quads per layer.
///
/// Quads are appended as they arrive and each bucket is stable-sorted by order
/// key once, in [`flatten_into`](LayerBuckets::flatten_into), so quads with
/// equal keys keep their insertion order. Buckets keep their allocations
/// across [`clear`](LayerBuckets::clear) so a steady-state frame does not
/// allocate.
#[derive(Debug)]
pub struct LayerBuckets {
    layers: [Vec<Quad>; MAX_LAYERS],
    len: usize,
}

impl LayerBuckets {
    pub fn new() -> Self {
        Self {
            layers: std::array::from_fn(|_| Vec::new()),
            len: 0,
        }
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
        self.len = 0;
    }

    /// Append `quad` to `layer`.
    ///
    /// # Panics
    /// Panics if `layer >= MAX_LAYERS`; the batch checks this beforehand.
    pub fn insert(&mut self, layer: usize, quad: Quad) {
        self.layers[layer].push(quad);
        self.len += 1;
    }

    /// Stable-sort every bucket by order key.
    pub fn sort(&mut self) {
        for bucket in &mut self.layers {
            bucket.sort_by_key(|q| q.order);
        }
    }

    /// Sort the buckets, then append every quad's vertices to `out`, layer 0
    /// first, ascending order key within a layer.
    pub fn flatten_into(&mut self, out: &mut Vec<Vertex>) {
        self.sort();
        out.reserve(self.len * 4);
        for quad in self.iter() {
            out.extend_from_slice(&quad.vertices);
        }
    }

    /// Iterate quads layer by layer. Within a layer quads come in insertion
    /// order until [`sort`](LayerBuckets::sort) has run.
    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.layers.iter().flatten()
    }

    /// Total number of quads across all layers.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of quads in `layer` (0 for out-of-range layers).
    pub fn layer_len(&self, layer: usize) -> usize {
        self.layers.get(layer).map_or(0, Vec::len)
    }

    /// Number of layers holding at least one quad.
    pub fn layers_used(&self) -> usize {
        self.layers.iter().filter(|l| !l.is_empty()).count()
    }
}

impl Default for LayerBuckets {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A quad tagged through its x coordinate so tests can tell quads apart.
    fn quad(tag: f32, order: i32) -> Quad {
        let vertex = Vertex {
            position: [tag, 0.0],
            ..Default::default()
        };
        Quad {
            vertices: [vertex; 4],
            order,
        }
    }

    fn tags(buckets: &mut LayerBuckets) -> Vec<f32> {
        buckets.sort();
        buckets.iter().map(|q| q.vertices[0].position[0]).collect()
    }

    #[test]
    fn test_sorted_by_order_within_layer() {
        let mut buckets = LayerBuckets::new();
        buckets.insert(0, quad(1.0, 5));
        buckets.insert(0, quad(2.0, -1));
        buckets.insert(0, quad(3.0, 2));

        assert_eq!(tags(&mut buckets), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_equal_orders_keep_insertion_order() {
        let mut buckets = LayerBuckets::new();
        buckets.insert(2, quad(1.0, 0));
        buckets.insert(2, quad(2.0, 1));
        buckets.insert(2, quad(3.0, 0));
        buckets.insert(2, quad(4.0, 0));

        assert_eq!(tags(&mut buckets), vec![1.0, 3.0, 4.0, 2.0]);
    }

    #[test]
    fn test_descending_orders_come_out_ascending() {
        let mut buckets = LayerBuckets::new();
        for i in 0..1000 {
            buckets.insert(0, quad(i as f32, -(i / 2)));
        }

        let mut out = Vec::new();
        buckets.flatten_into(&mut out);

        let orders: Vec<i32> = buckets.iter().map(|q| q.order).collect();
        assert!(orders.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(orders[0], -499);

        // Pairs sharing a key keep their draw order
        let firsts: Vec<f32> = out.chunks(4).map(|c| c[0].position[0]).collect();
        assert_eq!(&firsts[..4], &[998.0, 999.0, 996.0, 997.0]);
        assert_eq!(&firsts[998..], &[0.0, 1.0]);
    }

    #[test]
    fn test_insert_appends_until_sorted() {
        let mut buckets = LayerBuckets::new();
        buckets.insert(0, quad(1.0, 3));
        buckets.insert(0, quad(2.0, 1));

        let unsorted: Vec<i32> = buckets.iter().map(|q| q.order).collect();
        assert_eq!(unsorted, vec![3, 1]);

        buckets.sort();
        let sorted: Vec<i32> = buckets.iter().map(|q| q.order).collect();
        assert_eq!(sorted, vec![1, 3]);
    }

    #[test]
    fn test_layers_flatten_back_to_front() {
        let mut buckets = LayerBuckets::new();
        buckets.insert(3, quad(30.0, -100));
        buckets.insert(0, quad(0.0, 100));
        buckets.insert(1, quad(10.0, 0));

        let mut out = Vec::new();
        buckets.flatten_into(&mut out);

        assert_eq!(out.len(), 12);
        let firsts: Vec<f32> = out.chunks(4).map(|c| c[0].position[0]).collect();
        assert_eq!(firsts, vec![0.0, 10.0, 30.0]);
        assert_eq!(buckets.layers_used(), 3);
    }

    #[test]
    fn test_clear_empties_all_layers() {
        let mut buckets = LayerBuckets::new();
        for layer in 0..MAX_LAYERS {
            buckets.insert(layer, quad(layer as f32, 0));
        }
        assert_eq!(buckets.len(), MAX_LAYERS);

        buckets.clear();
        buckets.clear();

        assert!(buckets.is_empty());
        assert_eq!(buckets.iter().count(), 0);
        assert_eq!(buckets.layer_len(0), 0);
        assert_eq!(buckets.layer_len(MAX_LAYERS), 0);
    }
}
