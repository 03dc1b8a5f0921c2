use crate::body::Body;
use ultraviolet::Vec2;

/// Uniform grid over the domain square used for neighbor queries. Rebuilt from
/// scratch every step; positions move each step, so carrying a stale grid
/// across steps would return wrong neighbor sets.
pub struct CellList {
    pub domain_size: f32,
    pub cell_size: f32,
    grid_size: usize,
    cells: Vec<Vec<usize>>,
}

impl CellList {
    pub fn new(domain_size: f32, cell_size: f32) -> Self {
        let grid_size = (domain_size / cell_size).ceil() as usize + 1;
        Self {
            domain_size,
            cell_size,
            grid_size,
            cells: Vec::new(),
        }
    }

    pub fn rebuild(&mut self, bodies: &[Body]) {
        self.grid_size = (self.domain_size / self.cell_size).ceil() as usize + 1;
        self.cells.clear();
        self.cells.resize(self.grid_size * self.grid_size, Vec::new());
        for (i, b) in bodies.iter().enumerate() {
            let (cx, cy) = self.coord(b.pos);
            self.cells[cx + cy * self.grid_size].push(i);
        }
    }

    fn coord(&self, pos: Vec2) -> (usize, usize) {
        let x = (pos.x / self.cell_size).floor() as isize;
        let y = (pos.y / self.cell_size).floor() as isize;
        let x = x.clamp(0, self.grid_size as isize - 1) as usize;
        let y = y.clamp(0, self.grid_size as isize - 1) as usize;
        (x, y)
    }

    /// Indices of all bodies within `cutoff` of body `i`, excluding `i` itself.
    pub fn find_neighbors_within(&self, bodies: &[Body], i: usize, cutoff: f32) -> Vec<usize> {
        let (cx, cy) = self.coord(bodies[i].pos);
        let range = (cutoff / self.cell_size).ceil() as isize;
        let cutoff_sq = cutoff * cutoff;
        let mut neighbors = Vec::new();
        for dy in -range..=range {
            for dx in -range..=range {
                let x = cx as isize + dx;
                let y = cy as isize + dy;
                if x < 0 || y < 0 || x >= self.grid_size as isize || y >= self.grid_size as isize {
                    continue;
                }
                let cell_idx = x as usize + y as usize * self.grid_size;
                for &idx in &self.cells[cell_idx] {
                    if idx != i {
                        let r2 = (bodies[idx].pos - bodies[i].pos).mag_sq();
                        if r2 < cutoff_sq {
                            neighbors.push(idx);
                        }
                    }
                }
            }
        }
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BaseType;
    use crate::config;

    fn body_at(x: f32, y: f32) -> Body {
        Body::new(Vec2::new(x, y), BaseType::A)
    }

    #[test]
    fn finds_neighbors_inside_radius_only() {
        let bodies = vec![
            body_at(50.0, 50.0),
            body_at(50.5, 50.0), // within 1.0
            body_at(51.5, 50.0), // outside 1.0, within 2.0
            body_at(80.0, 80.0), // far away
        ];
        let mut list = CellList::new(config::DOMAIN_SIZE, config::CELL_INTERACTION_RADIUS);
        list.rebuild(&bodies);

        let near = list.find_neighbors_within(&bodies, 0, 1.0);
        assert_eq!(near, vec![1]);

        let mut wide = list.find_neighbors_within(&bodies, 0, 2.0);
        wide.sort_unstable();
        assert_eq!(wide, vec![1, 2]);
    }

    #[test]
    fn query_never_returns_self() {
        let bodies = vec![body_at(10.0, 10.0), body_at(10.1, 10.0)];
        let mut list = CellList::new(config::DOMAIN_SIZE, config::CELL_INTERACTION_RADIUS);
        list.rebuild(&bodies);
        let neighbors = list.find_neighbors_within(&bodies, 0, 2.0);
        assert!(!neighbors.contains(&0));
    }

    #[test]
    fn rebuild_reflects_moved_positions() {
        let mut bodies = vec![body_at(10.0, 10.0), body_at(90.0, 90.0)];
        let mut list = CellList::new(config::DOMAIN_SIZE, config::CELL_INTERACTION_RADIUS);
        list.rebuild(&bodies);
        assert!(list.find_neighbors_within(&bodies, 0, 2.0).is_empty());

        bodies[1].pos = Vec2::new(10.5, 10.0);
        list.rebuild(&bodies);
        assert_eq!(list.find_neighbors_within(&bodies, 0, 2.0), vec![1]);
    }
}
