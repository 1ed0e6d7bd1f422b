//! Reads puzzle descriptions: the dimension N, then N² tiles, all whitespace separated.

use std::fs;
use std::path::Path;

use crate::error::{BoardError, LoadError};
use crate::puzzle::Board;

pub fn parse_board(input: &str) -> Result<Board, BoardError> {
    let mut tokens = input.split_whitespace();

    let dimension = match tokens.next() {
        Some(token) => parse_token(token)? as usize,
        None => return Err(BoardError::Empty),
    };
    let expected = dimension * dimension;

    let tiles = tokens.map(parse_token).collect::<Result<Vec<u32>, _>>()?;
    if tiles.len() != expected {
        return Err(BoardError::TokenCount {
            expected,
            found: tiles.len(),
        });
    }

    Board::from_tiles(&tiles)
}

pub fn read_board(path: &Path) -> Result<Board, LoadError> {
    let input = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_board(&input)?)
}

fn parse_token(token: &str) -> Result<u32, BoardError> {
    token.parse().map_err(|_| BoardError::InvalidToken {
        token: token.to_string(),
    })
}
