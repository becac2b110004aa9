//! The static model table.
//!
//! This table is emitted by the offline extractor that digests the vendor
//! driver sources; it is the single runtime source of truth for per-model
//! wiring. Sequences are shared per controller family, with the
//! size-dependent bytes baked in by the family macros below and the
//! window/cursor opcodes resolved against the model's extent at run time.

use crate::config::{BusyPolarity, Capabilities, ControllerFamily, ModelConfig};
use crate::error::{Error, Result};
use crate::format::PixelFormat;
use crate::sequence::{
    SEQ_DELAY_MS, SEQ_END, SEQ_HW_RESET, SEQ_SET_CURSOR, SEQ_SET_WINDOW, SEQ_SW_RESET,
    SEQ_WAIT_BUSY,
};

macro_rules! caps {
    () => { Capabilities::empty() };
    ($($c:ident)|+) => { Capabilities::from_bits_truncate(0 $(| Capabilities::$c.bits())+) };
}

/// SSD16xx-class full init: resets, gate count, data entry mode, full-panel
/// RAM window, border waveform, update-source control, cursor home.
macro_rules! ssd16xx_full {
    ($h:expr) => {
        &[
            SEQ_HW_RESET,
            SEQ_WAIT_BUSY,
            SEQ_SW_RESET,
            0x01, 3, (($h - 1) & 0xFF) as u8, ((($h - 1) >> 8) & 0xFF) as u8, 0x00,
            0x11, 1, 0x03,
            SEQ_SET_WINDOW,
            0x3C, 1, 0x05,
            0x21, 2, 0x00, 0x80,
            SEQ_SET_CURSOR,
            SEQ_WAIT_BUSY,
            SEQ_END,
        ]
    };
}

/// SSD16xx fast init: full bring-up plus the written-temperature shortcut.
macro_rules! ssd16xx_fast {
    ($h:expr) => {
        &[
            SEQ_HW_RESET,
            SEQ_WAIT_BUSY,
            SEQ_SW_RESET,
            0x01, 3, (($h - 1) & 0xFF) as u8, ((($h - 1) >> 8) & 0xFF) as u8, 0x00,
            0x11, 1, 0x03,
            SEQ_SET_WINDOW,
            0x3C, 1, 0x05,
            0x1A, 2, 0x5A, 0x00,
            0x22, 1, 0x91,
            0x20, 0,
            SEQ_WAIT_BUSY,
            SEQ_SET_CURSOR,
            SEQ_END,
        ]
    };
}

/// SSD16xx partial init: shallow reset with a floating border so the
/// untouched area keeps its charge.
const SSD16XX_PARTIAL: &[u8] = &[
    SEQ_HW_RESET,
    0x3C, 1, 0x80,
    SEQ_SET_WINDOW,
    SEQ_SET_CURSOR,
    SEQ_END,
];

/// SSD1677-class full init for the large panels: booster tuning before the
/// gate setup.
macro_rules! ssd1677_full {
    ($h:expr) => {
        &[
            SEQ_HW_RESET,
            SEQ_WAIT_BUSY,
            SEQ_SW_RESET,
            SEQ_WAIT_BUSY,
            0x0C, 5, 0xAE, 0xC7, 0xC3, 0xC0, 0x80,
            0x01, 3, (($h - 1) & 0xFF) as u8, ((($h - 1) >> 8) & 0xFF) as u8, 0x00,
            0x11, 1, 0x03,
            SEQ_SET_WINDOW,
            0x3C, 1, 0x01,
            0x18, 1, 0x80,
            SEQ_SET_CURSOR,
            SEQ_WAIT_BUSY,
            SEQ_END,
        ]
    };
}

/// UC8176 full init for the mono panels.
macro_rules! uc8176_full {
    ($w:expr, $h:expr) => {
        &[
            SEQ_HW_RESET,
            0x01, 4, 0x03, 0x00, 0x2B, 0x2B,
            0x06, 3, 0x17, 0x17, 0x17,
            0x04, 0,
            SEQ_WAIT_BUSY,
            0x00, 1, 0x3F,
            0x30, 1, 0x3A,
            0x61, 4, (($w >> 8) & 0xFF) as u8, ($w & 0xFF) as u8, (($h >> 8) & 0xFF) as u8, ($h & 0xFF) as u8,
            0x82, 1, 0x12,
            0x50, 1, 0x97,
            SEQ_END,
        ]
    };
}

/// UC8176 partial init for the flexible panels: border floats so partial
/// waveforms do not flash the frame.
const UC8176_PARTIAL: &[u8] = &[
    SEQ_HW_RESET,
    0x00, 1, 0xBF,
    0x50, 1, 0x17,
    SEQ_END,
];

/// UC8176 black/white/chromatic init, three-byte resolution form used by
/// the small panels.
macro_rules! uc8176_bwr_small {
    ($w:expr, $h:expr) => {
        &[
            SEQ_HW_RESET,
            0x06, 3, 0x17, 0x17, 0x17,
            0x04, 0,
            SEQ_WAIT_BUSY,
            0x00, 1, 0x8F,
            0x50, 1, 0x77,
            0x61, 3, ($w & 0xFF) as u8, (($h >> 8) & 0xFF) as u8, ($h & 0xFF) as u8,
            SEQ_END,
        ]
    };
}

/// UC8176 black/white/chromatic init, four-byte resolution form.
macro_rules! uc8176_bwr {
    ($w:expr, $h:expr) => {
        &[
            SEQ_HW_RESET,
            0x01, 4, 0x03, 0x00, 0x2B, 0x2B,
            0x06, 3, 0x17, 0x17, 0x17,
            0x04, 0,
            SEQ_WAIT_BUSY,
            0x00, 1, 0x0F,
            0x30, 1, 0x3A,
            0x61, 4, (($w >> 8) & 0xFF) as u8, ($w & 0xFF) as u8, (($h >> 8) & 0xFF) as u8, ($h & 0xFF) as u8,
            0x82, 1, 0x12,
            0x50, 1, 0x87,
            SEQ_END,
        ]
    };
}

/// UC8179 full init.
macro_rules! uc8179_full {
    ($w:expr, $h:expr, $panel:expr, $vcom:expr) => {
        &[
            SEQ_HW_RESET,
            0x06, 4, 0x17, 0x17, 0x27, 0x17,
            0x01, 4, 0x07, 0x17, 0x3F, 0x3F,
            0x04, 0,
            SEQ_WAIT_BUSY,
            0x00, 1, $panel,
            0x30, 1, 0x06,
            0x61, 4, (($w >> 8) & 0xFF) as u8, ($w & 0xFF) as u8, (($h >> 8) & 0xFF) as u8, ($h & 0xFF) as u8,
            0x15, 1, 0x00,
            0x50, 2, $vcom, 0x07,
            0x60, 1, 0x22,
            SEQ_END,
        ]
    };
}

/// UC8179 fast init: same bring-up with the quickened vcom interval.
macro_rules! uc8179_fast {
    ($w:expr, $h:expr) => {
        uc8179_full!($w, $h, 0x1F, 0x29)
    };
}

/// UC8179 partial init: vcom keeps the old image while the window updates.
macro_rules! uc8179_partial {
    ($w:expr, $h:expr) => {
        uc8179_full!($w, $h, 0x1F, 0x39)
    };
}

/// Four-color gate-driver init.
macro_rules! gate4_full {
    ($w:expr, $h:expr) => {
        &[
            SEQ_HW_RESET,
            SEQ_WAIT_BUSY,
            0x4D, 1, 0x78,
            0x00, 2, 0x0F, 0x29,
            0x01, 4, 0x07, 0x00, 0x22, 0x78,
            0x03, 1, 0x10,
            0x06, 3, 0x0F, 0x0A, 0x2F,
            0x30, 1, 0x13,
            0x50, 1, 0x37,
            0x60, 2, 0x02, 0x02,
            0x61, 4, (($w >> 8) & 0xFF) as u8, ($w & 0xFF) as u8, (($h >> 8) & 0xFF) as u8, ($h & 0xFF) as u8,
            0xE7, 1, 0x1C,
            0xE3, 1, 0x22,
            0xB4, 1, 0xD0,
            0xB5, 1, 0x03,
            0xE9, 1, 0x01,
            0x30, 1, 0x08,
            SEQ_END,
        ]
    };
}

/// ACeP init for the 4.01/5.65 inch panels.
macro_rules! acep_full {
    ($w:expr, $h:expr) => {
        &[
            SEQ_HW_RESET,
            SEQ_WAIT_BUSY,
            0x00, 2, 0xEF, 0x08,
            0x01, 4, 0x37, 0x00, 0x23, 0x23,
            0x03, 1, 0x00,
            0x06, 3, 0xC7, 0xC7, 0x1D,
            0x30, 1, 0x3C,
            0x41, 1, 0x00,
            0x50, 1, 0x37,
            0x60, 1, 0x22,
            0x61, 4, (($w >> 8) & 0xFF) as u8, ($w & 0xFF) as u8, (($h >> 8) & 0xFF) as u8, ($h & 0xFF) as u8,
            0xE3, 1, 0xAA,
            SEQ_DELAY_MS, 100,
            0x50, 1, 0x37,
            SEQ_END,
        ]
    };
}

/// ACeP init for the 7.3 inch panels, which front-load the command-enable
/// unlock and per-rail booster programming.
macro_rules! acep73_full {
    ($w:expr, $h:expr) => {
        &[
            SEQ_HW_RESET,
            SEQ_WAIT_BUSY,
            0xAA, 6, 0x49, 0x55, 0x20, 0x08, 0x09, 0x18,
            0x01, 6, 0x3F, 0x00, 0x32, 0x2A, 0x0E, 0x2A,
            0x00, 2, 0x5F, 0x69,
            0x03, 4, 0x00, 0x54, 0x00, 0x44,
            0x05, 4, 0x40, 0x1F, 0x1F, 0x2C,
            0x06, 4, 0x6F, 0x1F, 0x1F, 0x22,
            0x08, 4, 0x6F, 0x1F, 0x1F, 0x22,
            0x13, 2, 0x00, 0x04,
            0x30, 1, 0x3C,
            0x41, 1, 0x00,
            0x50, 1, 0x3F,
            0x60, 2, 0x02, 0x00,
            0x61, 4, (($w >> 8) & 0xFF) as u8, ($w & 0xFF) as u8, (($h >> 8) & 0xFF) as u8, ($h & 0xFF) as u8,
            0x82, 1, 0x1E,
            0x84, 1, 0x00,
            0x86, 1, 0x00,
            0xE3, 1, 0x2F,
            0xE0, 1, 0x00,
            0xE6, 1, 0x00,
            SEQ_END,
        ]
    };
}

/// One table row. Field order: name, size, format, busy polarity, reset
/// timing, display commands, sequences, sleep pair, capabilities, family.
macro_rules! model {
    ($name:literal, $w:expr, $h:expr, $fmt:ident, $busy:ident, $reset:expr,
     $dc:expr, $dc2:expr, $full:expr, $fast:expr, $partial:expr,
     $sleep_cmd:expr, $sleep_data:expr, $caps:expr, $family:ident) => {
        ModelConfig {
            name: $name,
            width: $w,
            height: $h,
            format: PixelFormat::$fmt,
            busy: BusyPolarity::$busy,
            reset_ms: $reset,
            display_cmd: $dc,
            display_cmd_2: $dc2,
            seq_full: $full,
            seq_fast: $fast,
            seq_partial: $partial,
            sleep_cmd: $sleep_cmd,
            sleep_data: $sleep_data,
            caps: $caps,
            family: ControllerFamily::$family,
        }
    };
}

const SSD_RESET: [u16; 3] = [10, 2, 10];
const UC_RESET: [u16; 3] = [20, 4, 20];
const ACEP_RESET: [u16; 3] = [20, 1, 20];

const SSD_SLEEP: &[u8] = &[0x01];
const UC_SLEEP: &[u8] = &[0xA5];

#[rustfmt::skip]
pub static MODELS: &[ModelConfig] = &[
    // SSD1608/SSD1680 mono panels with host-loaded waveforms.
    model!("epd1in54", 200, 200, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(200), Some(ssd16xx_fast!(200)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1680),
    model!("epd2in13", 122, 250, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(250), Some(ssd16xx_fast!(250)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1680),
    model!("epd2in13_v2", 122, 250, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(250), Some(ssd16xx_fast!(250)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1680),
    model!("epd2in9", 128, 296, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(296), Some(ssd16xx_fast!(296)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1680),

    // SSD1680/SSD1683 mono panels with OTP waveforms.
    model!("epd1in54_v2", 200, 200, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(200), Some(ssd16xx_fast!(200)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1677),
    model!("epd2in13_v3", 122, 250, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(250), Some(ssd16xx_fast!(250)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1677),
    model!("epd2in13_v4", 122, 250, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(250), Some(ssd16xx_fast!(250)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1677),
    model!("epd2in7_v2", 176, 264, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(264), Some(ssd16xx_fast!(264)), None,
        0x10, SSD_SLEEP, caps!(FAST), Ssd1677),
    model!("epd2in9_v2", 128, 296, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(296), Some(ssd16xx_fast!(296)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1677),
    model!("epd2in66", 152, 296, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd16xx_full!(296), None, Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL), Ssd1677),

    // SSD1677 large mono panels.
    model!("epd3in7", 280, 480, Gray4, High, SSD_RESET, 0x24, 0x00,
        ssd1677_full!(480), None, None,
        0x10, SSD_SLEEP, caps!(GRAYSCALE), Ssd1677),
    model!("epd4in2_v2", 400, 300, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd1677_full!(300), Some(ssd16xx_fast!(300)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1677),
    model!("epd4in26", 800, 480, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd1677_full!(480), Some(ssd16xx_fast!(480)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1677),
    model!("epd5in79", 792, 272, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd1677_full!(272), None, Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL), Ssd1677),
    model!("epd7in5_hd", 880, 528, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd1677_full!(528), None, None,
        0x10, SSD_SLEEP, caps!(), Ssd1677),
    model!("epd10in2", 960, 640, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd1677_full!(640), None, None,
        0x10, SSD_SLEEP, caps!(), Ssd1677),
    model!("epd13in3k", 960, 680, Mono, High, SSD_RESET, 0x24, 0x00,
        ssd1677_full!(680), Some(ssd16xx_fast!(680)), Some(SSD16XX_PARTIAL),
        0x10, SSD_SLEEP, caps!(PARTIAL | FAST), Ssd1677),

    // SSD black/white/red panels: black plane on 0x24, chromatic on 0x26.
    model!("epd1in54b_v2", 200, 200, Color4, High, SSD_RESET, 0x24, 0x26,
        ssd16xx_full!(200), None, None,
        0x10, SSD_SLEEP, caps!(DUAL_BUF), Ssd1677),
    model!("epd2in13b_v4", 122, 250, Color4, High, SSD_RESET, 0x24, 0x26,
        ssd16xx_full!(250), None, None,
        0x10, SSD_SLEEP, caps!(DUAL_BUF), Ssd1677),
    model!("epd2in66b", 152, 296, Color4, High, SSD_RESET, 0x24, 0x26,
        ssd16xx_full!(296), None, None,
        0x10, SSD_SLEEP, caps!(DUAL_BUF), Ssd1677),
    model!("epd2in9b_v4", 128, 296, Color4, High, SSD_RESET, 0x24, 0x26,
        ssd16xx_full!(296), None, None,
        0x10, SSD_SLEEP, caps!(DUAL_BUF), Ssd1677),
    model!("epd5in79b", 792, 272, Color4, High, SSD_RESET, 0x24, 0x26,
        ssd1677_full!(272), None, None,
        0x10, SSD_SLEEP, caps!(DUAL_BUF), Ssd1677),
    model!("epd7in5b_hd", 880, 528, Color4, High, SSD_RESET, 0x24, 0x26,
        ssd1677_full!(528), None, None,
        0x10, SSD_SLEEP, caps!(DUAL_BUF), Ssd1677),
    model!("epd10in2b", 960, 640, Color4, High, SSD_RESET, 0x24, 0x26,
        ssd1677_full!(640), None, None,
        0x10, SSD_SLEEP, caps!(DUAL_BUF), Ssd1677),
    model!("epd13in3b", 960, 680, Color4, High, SSD_RESET, 0x24, 0x26,
        ssd1677_full!(680), None, None,
        0x10, SSD_SLEEP, caps!(DUAL_BUF), Ssd1677),

    // UC8151/UC8176 mono panels, single transmission on 0x13.
    model!("epd1in02", 80, 128, Mono, Low, UC_RESET, 0x13, 0x00,
        uc8176_full!(80, 128), None, None,
        0x07, UC_SLEEP, caps!(), Generic),
    model!("epd2in7", 176, 264, Mono, Low, UC_RESET, 0x13, 0x00,
        uc8176_full!(176, 264), None, None,
        0x07, UC_SLEEP, caps!(), Generic),
    model!("epd2in9d", 128, 296, Mono, Low, UC_RESET, 0x13, 0x00,
        uc8176_full!(128, 296), None, Some(UC8176_PARTIAL),
        0x07, UC_SLEEP, caps!(PARTIAL), Generic),
    model!("epd2in13d", 104, 212, Mono, Low, UC_RESET, 0x13, 0x00,
        uc8176_full!(104, 212), None, Some(UC8176_PARTIAL),
        0x07, UC_SLEEP, caps!(PARTIAL), Generic),
    model!("epd3in52", 360, 240, Mono, Low, UC_RESET, 0x13, 0x00,
        uc8176_full!(360, 240), None, None,
        0x07, UC_SLEEP, caps!(), Generic),
    model!("epd4in2", 400, 300, Mono, Low, UC_RESET, 0x13, 0x00,
        uc8176_full!(400, 300), None, Some(UC8176_PARTIAL),
        0x07, UC_SLEEP, caps!(PARTIAL), Generic),
    model!("epd5in83", 600, 448, Mono, Low, UC_RESET, 0x13, 0x00,
        uc8176_full!(600, 448), None, None,
        0x07, UC_SLEEP, caps!(), Generic),
    model!("epd7in5", 640, 384, Mono, Low, UC_RESET, 0x13, 0x00,
        uc8176_full!(640, 384), None, None,
        0x07, UC_SLEEP, caps!(), Generic),
    model!("epd12in48", 1304, 984, Mono, Low, UC_RESET, 0x13, 0x00,
        uc8176_full!(1304, 984), None, None,
        0x07, UC_SLEEP, caps!(), Generic),

    // UC8176 black/white/chromatic pairs: black on 0x10, chromatic on 0x13.
    model!("epd1in54b", 200, 200, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr_small!(200, 200), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd1in54c", 152, 152, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr_small!(152, 152), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd2in13bc", 104, 212, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr_small!(104, 212), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd2in13b_v2", 104, 212, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr_small!(104, 212), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd2in13b_v3", 104, 212, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr_small!(104, 212), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd2in7b", 176, 264, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr!(176, 264), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd2in9bc", 128, 296, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr_small!(128, 296), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd2in9b_v2", 128, 296, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr_small!(128, 296), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd2in9b_v3", 128, 296, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr_small!(128, 296), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd4in2bc", 400, 300, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr!(400, 300), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd4in2b_v2", 400, 300, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr!(400, 300), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd5in83bc", 600, 448, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr!(600, 448), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd5in83b_v2", 648, 480, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr!(648, 480), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd7in5b", 640, 384, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr!(640, 384), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd7in5bc", 640, 384, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr!(640, 384), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),
    model!("epd12in48b_v2", 1304, 984, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8176_bwr!(1304, 984), None, None,
        0x07, UC_SLEEP, caps!(DUAL_BUF), Uc8176),

    // UC8179 panels.
    model!("epd5in83_v2", 648, 480, Mono, Low, UC_RESET, 0x10, 0x13,
        uc8179_full!(648, 480, 0x1F, 0x10), None, Some(uc8179_partial!(648, 480)),
        0x07, UC_SLEEP, caps!(PARTIAL | REGIONAL), Uc8179Mono),
    model!("epd7in5_v2", 800, 480, Mono, Low, UC_RESET, 0x10, 0x13,
        uc8179_full!(800, 480, 0x1F, 0x10), Some(uc8179_fast!(800, 480)), Some(uc8179_partial!(800, 480)),
        0x07, UC_SLEEP, caps!(PARTIAL | FAST | REGIONAL), Uc8179Mono),
    model!("epd7in5b_v2", 800, 480, Color4, Low, UC_RESET, 0x10, 0x13,
        uc8179_full!(800, 480, 0x0F, 0x11), None, Some(uc8179_partial!(800, 480)),
        0x07, UC_SLEEP, caps!(DUAL_BUF | PARTIAL | REGIONAL), Uc8179Bwr),

    // Four-color gate-driver panels, one packed buffer on 0x10.
    model!("epd1in64g", 168, 168, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(168, 168), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),
    model!("epd2in13g", 122, 250, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(122, 250), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),
    model!("epd2in15g", 160, 296, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(160, 296), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),
    model!("epd2in36g", 168, 296, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(168, 296), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),
    model!("epd2in66g", 184, 360, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(184, 360), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),
    model!("epd3in0g", 168, 400, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(168, 400), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),
    model!("epd4in0e", 600, 400, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(600, 400), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),
    model!("epd4in37g", 512, 368, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(512, 368), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),
    model!("epd5in79g", 792, 272, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(792, 272), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),
    model!("epd7in3g", 800, 480, Color4, Low, ACEP_RESET, 0x10, 0x00,
        gate4_full!(800, 480), None, None,
        0x07, UC_SLEEP, caps!(), GateColor4),

    // Seven-color ACeP panels.
    model!("epd4in01f", 640, 400, Color7, Low, ACEP_RESET, 0x10, 0x00,
        acep_full!(640, 400), None, None,
        0x07, UC_SLEEP, caps!(), Acep),
    model!("epd5in65f", 600, 448, Color7, Low, ACEP_RESET, 0x10, 0x00,
        acep_full!(600, 448), None, None,
        0x07, UC_SLEEP, caps!(), Acep),
    model!("epd7in3f", 800, 480, Color7, Low, ACEP_RESET, 0x10, 0x00,
        acep73_full!(800, 480), None, None,
        0x07, UC_SLEEP, caps!(), Acep),
    model!("epd7in3e", 800, 480, Color7, Low, ACEP_RESET, 0x10, 0x00,
        acep73_full!(800, 480), None, None,
        0x07, UC_SLEEP, caps!(), AcepRebooster),
];

/// Finds a model by exact name; the error carries up to three near-miss
/// names.
pub fn lookup(name: &str) -> Result<&'static ModelConfig> {
    if let Some(model) = MODELS.iter().find(|m| m.name == name) {
        return Ok(model);
    }
    let mut suggestions: Vec<String> = MODELS
        .iter()
        .map(|m| m.name)
        .filter(|candidate| similar(candidate, name))
        .map(String::from)
        .collect();
    suggestions.truncate(3);
    Err(Error::NotFound {
        name: name.into(),
        suggestions,
    })
}

/// Names of every model in the table, in table order.
pub fn model_names() -> impl Iterator<Item = &'static str> {
    MODELS.iter().map(|m| m.name)
}

fn similar(candidate: &str, query: &str) -> bool {
    if candidate.contains(query) || query.contains(candidate) {
        return true;
    }
    let shared = candidate
        .bytes()
        .zip(query.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    shared >= 6
}
