mod util;

mod tests {
    use inmet_array::{
        data::array::dimensions::strides_for,
        error::{IndexError, ShapeError},
        prelude::*,
    };

    #[test]
    fn round_trip_3x4() {
        let mut array = OwnedArray::<f64>::new([3, 4]).unwrap();
        let mut view = array.view_mut::<2>().unwrap();

        for i in 0..3 {
            for j in 0..4 {
                view[(i, j)] = (i * 10 + j) as f64;
            }
        }

        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(view[[i, j]], (i * 10 + j) as f64);
                assert_eq!(*view.get((i, j)).unwrap(), (i * 10 + j) as f64);
            }
        }

        assert_eq!(array[(2, 3)], 23.0);
    }

    #[test]
    fn row_major_strides_of_fresh_views() {
        let shapes: [&[usize]; 5] = [&[1], &[5], &[3, 4], &[2, 1, 3], &[4, 3, 2, 5]];

        for shape in shapes {
            let mut array = OwnedArray::<u8>::new(shape).unwrap();
            let view = array.view_dyn_mut();
            let strides = view.strides();
            let r = shape.len();

            assert_eq!(strides[r - 1], 1);
            for i in 0..r - 1 {
                assert_eq!(strides[i], strides[i + 1] * shape[i + 1]);
            }
            assert!(view.is_row_major());
        }
    }

    #[test]
    fn column_major_strides() {
        let shape = [4, 3, 2];
        let mut strides = [0; 3];
        strides_for(&shape, Order::ColumnMajor, &mut strides).unwrap();
        assert_eq!(strides, [1, 4, 12]);

        let mut array = OwnedArray::<i64>::new_with_order(shape, Order::ColumnMajor).unwrap();
        let view = array.view_mut::<3>().unwrap();
        assert_eq!(view.strides(), &strides);
        assert!(view.is_column_major());
    }

    #[test]
    fn zero_dimension() {
        let mut array = OwnedArray::<f32>::new([0, 5]).unwrap();
        let view = array.view_mut::<2>().unwrap();
        assert_eq!(view.size(), 0);
        assert_eq!(view.shape(), &[0, 5]);

        let err = view.get([0, 0]).unwrap_err();
        assert!(matches!(
            *err,
            ArrayError::IndexError(IndexError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn zero_dimension_with_huge_axis() {
        let mut data: Vec<u8> = Vec::new();
        let err = ArrayView::<u8, 3>::from_slice(&mut data, [0, usize::MAX, 2]).unwrap_err();
        assert!(matches!(
            *err,
            ArrayError::ShapeError(ShapeError::SizeOverflow { .. })
        ));

        let err = ArrayViewDyn::<u8>::from_slice_with_order(
            &mut data,
            [2, usize::MAX, 0],
            Order::ColumnMajor,
        )
        .unwrap_err();
        assert!(matches!(
            *err,
            ArrayError::ShapeError(ShapeError::SizeOverflow { .. })
        ));
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "bounds-check"))]
    #[should_panic(expected = "out-of-bounds")]
    fn unchecked_zero_dimension_panics() {
        let mut array = OwnedArray::<f32>::new([0, 5]).unwrap();
        let view = array.view_mut::<2>().unwrap();
        unsafe {
            view.get_unchecked([0, 0]);
        }
    }

    #[test]
    fn index_with_wrong_rank() {
        let mut array = OwnedArray::<u32>::new([2, 2]).unwrap();
        let view = array.view_mut::<2>().unwrap();
        let err = view.get([0, 0, 0]).unwrap_err();
        assert!(matches!(
            *err,
            ArrayError::IndexError(IndexError::RankMismatch {
                expected: 2,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    #[should_panic(expected = "index (3, 0) is out-of-bounds for array with shape (3, 4)")]
    fn index_out_of_bounds_panics() {
        let mut array = OwnedArray::<u32>::new([3, 4]).unwrap();
        let view = array.view_mut::<2>().unwrap();
        let _ = view[(3, 0)];
    }

    #[test]
    fn owned_array_rank_mismatch() {
        let mut array = OwnedArray::<u32>::new([2, 3, 4]).unwrap();
        let err = array.view_mut::<2>().unwrap_err();
        assert!(matches!(
            *err,
            ArrayError::ShapeError(ShapeError::RankMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn views_over_slices() {
        let mut data: Vec<i32> = (0..6).collect();
        let view = ArrayView::<i32, 1>::from_slice(&mut data, 6usize).unwrap();
        assert_eq!(view[4usize], 4);

        let mut data: Vec<i32> = (0..6).collect();
        let view = ArrayView::<i32, 2>::from_slice(&mut data, (2, 3)).unwrap();
        assert_eq!(view.rows(), 2);
        assert_eq!(view.cols(), 3);
        assert_eq!(view.transpose().to_vec(), [0, 3, 1, 4, 2, 5]);
    }
}
