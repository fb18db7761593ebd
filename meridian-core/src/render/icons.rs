//! Status icons and the rule for when they show
//!
//! Icons are 24x24 1-bit bitmaps authored as ASCII art and packed at compile
//! time, one `u32` per row.

use super::color::Color;
use super::frame::Frame;
use crate::state::Phase;
use crate::traits::{Bitmap, Surface};

/// Icon edge length in pixels
pub const ICON_SIZE: i32 = 24;

pub const WIFI_COLOR: Color = Color::rgb(230, 230, 230);
pub const WIFI_OFF_COLOR: Color = Color::rgb(240, 50, 50);
pub const SYNC_COLOR: Color = Color::rgb(80, 200, 255);

const fn pack(art: [&str; 24]) -> [u32; 24] {
    let mut rows = [0u32; 24];
    let mut y = 0;
    while y < 24 {
        let bytes = art[y].as_bytes();
        let mut x = 0;
        while x < bytes.len() && x < 24 {
            if bytes[x] == b'#' {
                rows[y] |= 1 << (23 - x);
            }
            x += 1;
        }
        y += 1;
    }
    rows
}

const WIFI_ROWS: [u32; 24] = pack([
    "........................",
    "........................",
    ".........######.........",
    ".....##############.....",
    "...##################...",
    "..######........######..",
    ".####..............####.",
    "####.....######.....####",
    ".#....############....#.",
    ".....##############.....",
    "....####........####....",
    "....###..........###....",
    "..........####..........",
    "........########........",
    ".......##########.......",
    "........##....##........",
    "........................",
    "...........##...........",
    "..........####..........",
    "..........####..........",
    "..........####..........",
    "...........##...........",
    "........................",
    "........................",
]);

const WIFI_OFF_ROWS: [u32; 24] = pack([
    "........................",
    "........................",
    ".###.....######.........",
    "..#################.....",
    "...##################...",
    "..######........######..",
    ".#######...........####.",
    "####..#########.....####",
    ".#....############....#.",
    ".....##############.....",
    "....####.###....####....",
    "....###...###....###....",
    "..........####..........",
    "........########........",
    ".......##########.......",
    "........##....###.......",
    "...............###......",
    "...........##...###.....",
    "..........####...###....",
    "..........####....###...",
    "..........####.....###..",
    "...........##.......###.",
    "........................",
    "........................",
]);

const SYNC_ROWS: [u32; 24] = pack([
    "............##..........",
    "............###.........",
    "............####........",
    "........#...#####.......",
    "......###...######......",
    ".....####...###.###.....",
    "....###.....##...###....",
    "....##......#.....##....",
    "...###............###...",
    "...##..............##...",
    "...##..............##...",
    "..###..............###..",
    "..###..............###..",
    "...##..............##...",
    "...##..............##...",
    "...###............###...",
    "....##.....#......##....",
    "....###...##.....###....",
    ".....###.###...####.....",
    "......######...###......",
    ".......#####...#........",
    "........####............",
    ".........###............",
    "..........##............",
]);

pub const WIFI: Bitmap = Bitmap {
    width: 24,
    height: 24,
    rows: &WIFI_ROWS,
};

pub const WIFI_OFF: Bitmap = Bitmap {
    width: 24,
    height: 24,
    rows: &WIFI_OFF_ROWS,
};

pub const SYNC: Bitmap = Bitmap {
    width: 24,
    height: 24,
    rows: &SYNC_ROWS,
};

/// What the connectivity icon slot shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiIcon {
    Connected,
    Offline,
    Hidden,
}

/// Connectivity icon for `phase`; `Connecting` blinks
pub fn wifi_icon(phase: Phase, blink: bool) -> WifiIcon {
    match phase {
        Phase::ConnectedNotSynced | Phase::ConnectedSyncing | Phase::ConnectedSynced => {
            WifiIcon::Connected
        }
        Phase::Connecting if blink => WifiIcon::Connected,
        Phase::NotConfigured | Phase::Disconnected => WifiIcon::Offline,
        Phase::Connecting | Phase::ResetPending => WifiIcon::Hidden,
    }
}

/// Whether the sync icon is lit: blinking while a sync runs or is requested
pub fn sync_icon_visible(frame: &Frame<'_>) -> bool {
    (frame.phase == Phase::ConnectedSyncing || frame.sync_requested) && frame.blink
}

/// Draw `bitmap` at (`x`, `y`), or clear the slot when `None`
pub fn draw_icon<S: Surface + ?Sized>(
    surface: &mut S,
    x: i32,
    y: i32,
    icon: Option<(&Bitmap, Color)>,
    background: Color,
) {
    match icon {
        Some((bitmap, color)) => surface.draw_bitmap(x, y, bitmap, color, background),
        None => surface.fill_rect(x, y, ICON_SIZE as u32, ICON_SIZE as u32, background),
    }
}

/// Draw the connectivity and sync icons into their slots
pub fn draw_status_icons<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame<'_>,
    wifi_at: (i32, i32),
    sync_at: (i32, i32),
    background: Color,
) {
    let wifi = match wifi_icon(frame.phase, frame.blink) {
        WifiIcon::Connected => Some((&WIFI, WIFI_COLOR)),
        WifiIcon::Offline => Some((&WIFI_OFF, WIFI_OFF_COLOR)),
        WifiIcon::Hidden => None,
    };
    draw_icon(surface, wifi_at.0, wifi_at.1, wifi, background);

    let sync = sync_icon_visible(frame).then_some((&SYNC, SYNC_COLOR));
    draw_icon(surface, sync_at.0, sync_at.1, sync, background);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Op, RecordingSurface};

    fn frame(phase: Phase, blink: bool, sync_requested: bool) -> Frame<'static> {
        Frame {
            phase,
            blink,
            sync_requested,
            status: None,
            time: None,
        }
    }

    #[test]
    fn test_art_packing() {
        // Top row of the sync arrow head: columns 12 and 13
        assert_eq!(SYNC_ROWS[0], (1 << 11) | (1 << 10));
        assert!(WIFI.is_set(11, 18));
        assert!(!WIFI.is_set(0, 0));
    }

    #[test]
    fn test_wifi_icon_rules() {
        assert_eq!(wifi_icon(Phase::ConnectedSynced, false), WifiIcon::Connected);
        assert_eq!(wifi_icon(Phase::Connecting, true), WifiIcon::Connected);
        assert_eq!(wifi_icon(Phase::Connecting, false), WifiIcon::Hidden);
        assert_eq!(wifi_icon(Phase::Disconnected, false), WifiIcon::Offline);
        assert_eq!(wifi_icon(Phase::NotConfigured, true), WifiIcon::Offline);
        assert_eq!(wifi_icon(Phase::ResetPending, true), WifiIcon::Hidden);
    }

    #[test]
    fn test_sync_icon_blinks_while_requested() {
        assert!(sync_icon_visible(&frame(Phase::ConnectedSyncing, true, false)));
        assert!(!sync_icon_visible(&frame(Phase::ConnectedSyncing, false, false)));
        assert!(sync_icon_visible(&frame(Phase::ConnectedSynced, true, true)));
        assert!(!sync_icon_visible(&frame(Phase::ConnectedSynced, true, false)));
    }

    #[test]
    fn test_hidden_icon_clears_slot() {
        let mut surface = RecordingSurface::new();
        let f = frame(Phase::ResetPending, false, false);
        draw_status_icons(&mut surface, &f, (34, 34), (182, 34), Color::BLACK);

        assert_eq!(
            surface.ops(),
            &[
                Op::FillRect { x: 34, y: 34, w: 24, h: 24, color: Color::BLACK },
                Op::FillRect { x: 182, y: 34, w: 24, h: 24, color: Color::BLACK },
            ]
        );
    }
}
