//! 1-D Gauss–Legendre abscissae and weights on `[-1, 1]`.

use crate::math::Real;

static GL1: [(Real, Real); 1] = [(0.0, 2.0)];

static GL2: [(Real, Real); 2] = [
    (-0.577_350_269_189_625_76, 1.0),
    (0.577_350_269_189_625_76, 1.0),
];

static GL3: [(Real, Real); 3] = [
    (-0.774_596_669_241_483_38, 0.555_555_555_555_555_56),
    (0.0, 0.888_888_888_888_888_89),
    (0.774_596_669_241_483_38, 0.555_555_555_555_555_56),
];

static GL4: [(Real, Real); 4] = [
    (-0.861_136_311_594_052_58, 0.347_854_845_137_453_86),
    (-0.339_981_043_584_856_26, 0.652_145_154_862_546_14),
    (0.339_981_043_584_856_26, 0.652_145_154_862_546_14),
    (0.861_136_311_594_052_58, 0.347_854_845_137_453_86),
];

static GL5: [(Real, Real); 5] = [
    (-0.906_179_845_938_663_99, 0.236_926_885_056_189_09),
    (-0.538_469_310_105_683_09, 0.478_628_670_499_366_47),
    (0.0, 0.568_888_888_888_888_89),
    (0.538_469_310_105_683_09, 0.478_628_670_499_366_47),
    (0.906_179_845_938_663_99, 0.236_926_885_056_189_09),
];

static GL6: [(Real, Real); 6] = [
    (-0.932_469_514_203_152_03, 0.171_324_492_379_170_35),
    (-0.661_209_386_466_264_51, 0.360_761_573_048_138_61),
    (-0.238_619_186_083_196_91, 0.467_913_934_572_691_05),
    (0.238_619_186_083_196_91, 0.467_913_934_572_691_05),
    (0.661_209_386_466_264_51, 0.360_761_573_048_138_61),
    (0.932_469_514_203_152_03, 0.171_324_492_379_170_35),
];

static GL7: [(Real, Real); 7] = [
    (-0.949_107_912_342_758_52, 0.129_484_966_168_869_69),
    (-0.741_531_185_599_394_44, 0.279_705_391_489_276_67),
    (-0.405_845_151_377_397_17, 0.381_830_050_505_118_94),
    (0.0, 0.417_959_183_673_469_39),
    (0.405_845_151_377_397_17, 0.381_830_050_505_118_94),
    (0.741_531_185_599_394_44, 0.279_705_391_489_276_67),
    (0.949_107_912_342_758_52, 0.129_484_966_168_869_69),
];

static GL8: [(Real, Real); 8] = [
    (-0.960_289_856_497_536_23, 0.101_228_536_290_376_26),
    (-0.796_666_477_413_626_74, 0.222_381_034_453_374_47),
    (-0.525_532_409_916_328_99, 0.313_706_645_877_887_29),
    (-0.183_434_642_495_649_80, 0.362_683_783_378_361_98),
    (0.183_434_642_495_649_80, 0.362_683_783_378_361_98),
    (0.525_532_409_916_328_99, 0.313_706_645_877_887_29),
    (0.796_666_477_413_626_74, 0.222_381_034_453_374_47),
    (0.960_289_856_497_536_23, 0.101_228_536_290_376_26),
];

static GL9: [(Real, Real); 9] = [
    (-0.968_160_239_507_626_09, 0.081_274_388_361_574_41),
    (-0.836_031_107_326_635_79, 0.180_648_160_694_857_40),
    (-0.613_371_432_700_590_40, 0.260_610_696_402_935_46),
    (-0.324_253_423_403_808_93, 0.312_347_077_040_002_84),
    (0.0, 0.330_239_355_001_259_76),
    (0.324_253_423_403_808_93, 0.312_347_077_040_002_84),
    (0.613_371_432_700_590_40, 0.260_610_696_402_935_46),
    (0.836_031_107_326_635_79, 0.180_648_160_694_857_40),
    (0.968_160_239_507_626_09, 0.081_274_388_361_574_41),
];

static GL10: [(Real, Real); 10] = [
    (-0.973_906_528_517_171_72, 0.066_671_344_308_688_14),
    (-0.865_063_366_688_984_51, 0.149_451_349_150_580_59),
    (-0.679_409_568_299_024_41, 0.219_086_362_515_982_04),
    (-0.433_395_394_129_247_19, 0.269_266_719_309_996_36),
    (-0.148_874_338_981_631_21, 0.295_524_224_714_752_87),
    (0.148_874_338_981_631_21, 0.295_524_224_714_752_87),
    (0.433_395_394_129_247_19, 0.269_266_719_309_996_36),
    (0.679_409_568_299_024_41, 0.219_086_362_515_982_04),
    (0.865_063_366_688_984_51, 0.149_451_349_150_580_59),
    (0.973_906_528_517_171_72, 0.066_671_344_308_688_14),
];

/// The `n`-point Gauss–Legendre rule on `[-1, 1]`, exact for polynomials of
/// degree `2n - 1`. Supported for `1 <= n <= 10`.
pub fn gauss_legendre(n: usize) -> &'static [(Real, Real)] {
    match n {
        1 => &GL1,
        2 => &GL2,
        3 => &GL3,
        4 => &GL4,
        5 => &GL5,
        6 => &GL6,
        7 => &GL7,
        8 => &GL8,
        9 => &GL9,
        10 => &GL10,
        _ => panic!("no tabulated Gauss-Legendre rule with {n} points"),
    }
}

/// Number of 1-D points needed for exactness at `degree`.
pub(crate) fn points_for_degree(degree: u32) -> usize {
    ((degree as usize) / 2 + 1).clamp(1, 10)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Real;

    #[test]
    fn weights_sum_to_two() {
        for n in 1..=10 {
            let sum: Real = gauss_legendre(n).iter().map(|&(_, w)| w).sum();
            assert_relative_eq!(sum, 2.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn integrates_monomials_exactly() {
        // x^k on [-1, 1] integrates to 0 (odd) or 2 / (k + 1) (even)
        for n in 1..=10usize {
            for k in 0..=(2 * n - 1) as u32 {
                let num: Real = gauss_legendre(n)
                    .iter()
                    .map(|&(x, w)| w * x.powi(k as i32))
                    .sum();
                let exact = if k % 2 == 1 {
                    0.0
                } else {
                    2.0 / (k as Real + 1.0)
                };
                assert_relative_eq!(num, exact, epsilon = 1e-12);
            }
        }
    }
}
