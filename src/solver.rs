//! A* search that races a board against its twin.
//!
//! Both boards seed one frontier. Exactly one of them can reach the goal, so the
//! lineage of the first goal popped tells whether the original board is solvable.

use std::cmp::Ordering;
use std::rc::Rc;

use log::{debug, trace};

use crate::error::SolveError;
use crate::frontier::Frontier;
use crate::puzzle::{Board, Move};

/// A board on the frontier together with the path cost that reached it.
#[derive(Debug)]
pub struct SearchNode {
    board: Rc<Board>,
    moves: usize,
    priority: usize,
    parent: Option<Rc<SearchNode>>,
    from_twin: bool,
}

impl SearchNode {
    fn root(board: Board, from_twin: bool) -> Rc<Self> {
        let priority = board.manhattan();
        Rc::new(Self {
            board: Rc::new(board),
            moves: 0,
            priority,
            parent: None,
            from_twin,
        })
    }

    fn child(parent: &Rc<SearchNode>, board: Rc<Board>) -> Rc<Self> {
        let moves = parent.moves + 1;
        Rc::new(Self {
            priority: moves + board.manhattan(),
            board,
            moves,
            parent: Some(Rc::clone(parent)),
            from_twin: parent.from_twin,
        })
    }

    pub fn board(&self) -> &Rc<Board> {
        &self.board
    }

    /// Slides made since the root.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Moves so far plus the Manhattan estimate of what remains.
    pub fn priority(&self) -> usize {
        self.priority
    }

    pub fn parent(&self) -> Option<&Rc<SearchNode>> {
        self.parent.as_ref()
    }

    pub fn from_twin(&self) -> bool {
        self.from_twin
    }
}

/// Frontier order: lowest estimated total first, then the board nearer the goal.
pub fn by_estimate(a: &Rc<SearchNode>, b: &Rc<SearchNode>) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.board.manhattan().cmp(&b.board.manhattan()))
}

#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Give up after this many expansions. `None` searches until a goal is popped.
    pub max_expansions: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub enqueued: usize,
    pub max_frontier: usize,
}

#[derive(Debug)]
pub struct Solver {
    solution: Option<Vec<Rc<Board>>>,
    stats: SearchStats,
}

impl Solver {
    pub fn new(initial: Board) -> Result<Self, SolveError> {
        Self::with_config(initial, &SolverConfig::default())
    }

    pub fn with_config(initial: Board, config: &SolverConfig) -> Result<Self, SolveError> {
        debug!(
            "solving {0}x{0} board, manhattan {1}, hamming {2}",
            initial.dimension(),
            initial.manhattan(),
            initial.hamming()
        );

        let twin = initial.twin();
        let mut frontier = Frontier::new(by_estimate);
        frontier.push(SearchNode::root(initial, false));
        frontier.push(SearchNode::root(twin, true));

        let mut stats = SearchStats {
            enqueued: 2,
            max_frontier: 2,
            ..SearchStats::default()
        };

        let goal = loop {
            let current = frontier.pop().ok_or(SolveError::FrontierExhausted)?;
            if current.board.is_goal() {
                break current;
            }

            if let Some(limit) = config.max_expansions {
                if stats.expanded >= limit {
                    debug!("expansion limit {} reached", limit);
                    return Err(SolveError::ExpansionLimit { limit });
                }
            }
            stats.expanded += 1;
            trace!(
                "expanding g={} f={} twin={}",
                current.moves,
                current.priority,
                current.from_twin
            );

            for neighbor in current.board.neighbors() {
                let child = SearchNode::child(&current, neighbor);

                // Never step straight back to the grandparent
                let reverses = current
                    .parent
                    .as_ref()
                    .is_some_and(|grandparent| grandparent.board == child.board);
                if !reverses {
                    frontier.push(child);
                    stats.enqueued += 1;
                }
            }
            stats.max_frontier = stats.max_frontier.max(frontier.len());
        };

        debug!(
            "goal reached after {} expansions by the {} lineage",
            stats.expanded,
            if goal.from_twin { "twin" } else { "original" }
        );

        let solution = if goal.from_twin {
            None
        } else {
            Some(Self::trace_path(&goal))
        };

        Ok(Self { solution, stats })
    }

    fn trace_path(goal: &Rc<SearchNode>) -> Vec<Rc<Board>> {
        let mut path = Vec::with_capacity(goal.moves + 1);
        let mut current = Some(goal);
        while let Some(node) = current {
            path.push(Rc::clone(&node.board));
            current = node.parent.as_ref();
        }
        path.reverse();
        path
    }

    pub fn is_solvable(&self) -> bool {
        self.solution.is_some()
    }

    /// Fewest slides that solve the initial board, or `None` if it cannot be solved.
    pub fn move_count(&self) -> Option<usize> {
        self.solution.as_ref().map(|path| path.len() - 1)
    }

    /// Boards from the initial board to the goal, both included.
    pub fn solution(&self) -> Option<&[Rc<Board>]> {
        self.solution.as_deref()
    }

    pub fn steps(&self) -> Option<Vec<Move>> {
        let path = self.solution.as_ref()?;
        Some(
            path.windows(2)
                .filter_map(|pair| Move::between(&pair[0], &pair[1]))
                .collect(),
        )
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    fn board(rows: &[[u32; 3]]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    // Breadth-first distance to the goal, for cross-checking small boards.
    fn bfs_distance(start: &Board) -> Option<usize> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start.tiles().to_vec());
        queue.push_back((start.clone(), 0));

        while let Some((current, depth)) = queue.pop_front() {
            if current.is_goal() {
                return Some(depth);
            }
            for mv in Move::ALL {
                if let Some(next) = current.slide(mv) {
                    if seen.insert(next.tiles().to_vec()) {
                        queue.push_back((next, depth + 1));
                    }
                }
            }
        }
        None
    }

    fn assert_valid_path(solver: &Solver) {
        let path = solver.solution().unwrap();
        assert_eq!(path.len() - 1, solver.move_count().unwrap());
        assert!(path.last().unwrap().is_goal());
        for pair in path.windows(2) {
            assert!(Move::between(&pair[0], &pair[1]).is_some());
        }
        assert_eq!(solver.steps().unwrap().len(), solver.move_count().unwrap());
    }

    #[test]
    fn one_move_from_goal() {
        let solver = Solver::new(board(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]])).unwrap();
        assert!(solver.is_solvable());
        assert_eq!(solver.move_count(), Some(1));

        let path = solver.solution().unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(*path[1], Board::goal(3).unwrap());
        assert_eq!(solver.steps(), Some(vec![Move::Left]));
    }

    #[test]
    fn already_solved() {
        let solver = Solver::new(Board::goal(3).unwrap()).unwrap();
        assert!(solver.is_solvable());
        assert_eq!(solver.move_count(), Some(0));
        assert_eq!(solver.solution().unwrap().len(), 1);
        assert_eq!(solver.stats().expanded, 0);
    }

    #[test]
    fn swapped_last_tiles_cannot_be_solved() {
        let solver = Solver::new(board(&[[1, 2, 3], [4, 5, 6], [8, 7, 0]])).unwrap();
        assert!(!solver.is_solvable());
        assert_eq!(solver.move_count(), None);
        assert!(solver.solution().is_none());
        assert!(solver.steps().is_none());
    }

    #[test]
    fn four_move_puzzle() {
        let solver = Solver::new(board(&[[0, 1, 3], [4, 2, 5], [7, 8, 6]])).unwrap();
        assert_eq!(solver.move_count(), Some(4));
        assert_eq!(
            solver.steps(),
            Some(vec![Move::Left, Move::Up, Move::Left, Move::Up])
        );
        assert_valid_path(&solver);
    }

    #[test]
    fn matches_breadth_first_distance() {
        let b = board(&[[8, 1, 3], [4, 0, 2], [7, 6, 5]]);
        let expected = bfs_distance(&b);
        let solver = Solver::new(b).unwrap();
        assert_eq!(solver.move_count(), expected);
        assert_valid_path(&solver);
    }

    #[test]
    fn four_by_four() {
        let b = Board::from_rows(&[
            [1u32, 2, 3, 4],
            [5, 6, 0, 8],
            [9, 10, 7, 11],
            [13, 14, 15, 12],
        ])
        .unwrap();
        let solver = Solver::new(b).unwrap();
        assert_eq!(solver.move_count(), Some(3));
        assert_valid_path(&solver);
    }

    #[test]
    fn expansion_limit() {
        let config = SolverConfig {
            max_expansions: Some(0),
        };
        let err = Solver::with_config(board(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]]), &config)
            .unwrap_err();
        assert_eq!(err, SolveError::ExpansionLimit { limit: 0 });

        let solver = Solver::with_config(Board::goal(3).unwrap(), &config).unwrap();
        assert_eq!(solver.move_count(), Some(0));
    }

    #[test]
    fn ordering_prefers_lower_estimate_then_nearer_board() {
        let near = SearchNode::root(board(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]]), false);
        let far = SearchNode::root(board(&[[1, 2, 3], [4, 5, 6], [0, 7, 8]]), false);
        assert_eq!(by_estimate(&near, &far), Ordering::Less);

        // Equal estimates, the nearer board wins
        let tied = SearchNode::child(&far, Rc::new(board(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]])));
        assert_eq!(tied.priority(), far.priority());
        assert_eq!(by_estimate(&tied, &far), Ordering::Less);

        let mut frontier = Frontier::new(by_estimate);
        frontier.push(Rc::clone(&far));
        frontier.push(Rc::clone(&tied));
        frontier.push(Rc::clone(&near));
        assert!(Rc::ptr_eq(&frontier.pop().unwrap(), &near));
        assert!(Rc::ptr_eq(&frontier.pop().unwrap(), &tied));
        assert!(Rc::ptr_eq(&frontier.pop().unwrap(), &far));
    }

    #[test]
    fn children_inherit_lineage() {
        let root = SearchNode::root(Board::goal(3).unwrap().twin(), true);
        let next = Rc::new(Board::goal(3).unwrap());
        let child = SearchNode::child(&root, next);
        assert!(child.from_twin());
        assert_eq!(child.moves(), 1);
        assert!(Rc::ptr_eq(child.parent().unwrap(), &root));
        assert_eq!(child.board().manhattan(), 0);
    }

    proptest! {
        #[test]
        fn exactly_one_of_board_and_twin(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let b = Board::shuffled(2, &mut rng).unwrap();
            let original = Solver::new(b.clone()).unwrap();
            let twin = Solver::new(b.twin()).unwrap();
            prop_assert_ne!(original.is_solvable(), twin.is_solvable());
            prop_assert_eq!(original.is_solvable(), b.is_solvable_by_parity());
        }

        #[test]
        fn scrambled_boards_solve_optimally(seed in any::<u64>(), steps in 0..14usize) {
            let mut rng = StdRng::seed_from_u64(seed);
            let b = Board::scrambled(3, steps, &mut rng).unwrap();
            let expected = bfs_distance(&b);
            let solver = Solver::new(b).unwrap();
            prop_assert_eq!(solver.move_count(), expected);
            prop_assert!(solver.move_count().unwrap() <= steps);
            assert_valid_path(&solver);
        }

        #[test]
        fn twin_of_near_goal_is_rejected(seed in any::<u64>(), steps in 0..14usize) {
            let mut rng = StdRng::seed_from_u64(seed);
            let b = Board::scrambled(3, steps, &mut rng).unwrap();
            let solver = Solver::new(b.twin()).unwrap();
            prop_assert!(!solver.is_solvable());
            prop_assert_eq!(solver.move_count(), None);
        }
    }
}
