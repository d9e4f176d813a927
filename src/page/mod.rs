//! page — кодек страницы: alignment math и два фиксированных заголовка.
//!
//! Страница 64 KiB начинается с PageHeader (8 байт), дальше подряд идут
//! записи: UnitHeader (4 байта) + payload, выровненный до 4-байтового юнита.
//! Байты за пределами watermark (`packing_count`) для читателя не существуют.

pub mod header;
pub mod unit;

pub use header::PageHeader;
pub use unit::UnitHeader;

use crate::consts::LOG_UNIT_PACKING;

/// Округление вверх до границы 4-байтового юнита.
#[inline]
pub fn aligned_size(n: usize) -> usize {
    (n + LOG_UNIT_PACKING - 1) / LOG_UNIT_PACKING * LOG_UNIT_PACKING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_size_rounds_up_to_units() {
        assert_eq!(aligned_size(0), 0);
        assert_eq!(aligned_size(1), 4);
        assert_eq!(aligned_size(3), 4);
        assert_eq!(aligned_size(4), 4);
        assert_eq!(aligned_size(5), 8);
        assert_eq!(aligned_size(65533), 65536);
    }
}
