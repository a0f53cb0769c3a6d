/// A fixed-size 2D grid stored as a flat vector.
///
/// This grid is finite on both axes: rays cast through the world routinely
/// leave it, so the signed-coordinate [`get`] returns `None` rather than
/// wrapping or clamping to an edge value.
///
/// [`get`]: Tilemap::get
#[derive(Clone, Debug)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Bounds-checked lookup. `None` means "no data here", not an error.
    pub fn get(&self, x: i64, y: i64) -> Option<&T> {
        if self.contains(x, y) {
            Some(&self.data[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        assert!(x < self.width && y < self.height);
        self.data[y * self.width + x] = value;
    }

    /// Fill the entire grid with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }
}
