use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tarray::{
    ByteRegion, ByteStorage, DataView, ElementKind, Endian, StoragePool, TypedArray,
    ALL_ELEMENT_KINDS,
};

const REGION_LEN: usize = 64;

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn random_view<R: Rng>(rng: &mut R, region: &ByteRegion, kind: ElementKind) -> TypedArray {
    let size = kind.size();
    let slots = REGION_LEN / size;
    let start = rng.gen_range(0..=slots);
    let len = rng.gen_range(0..=slots - start);
    TypedArray::from_region(kind, region, Some((start * size) as i64), Some(len as i64)).unwrap()
}

#[test]
fn test_random_overlapping_set() {
    let mut rng = rand::thread_rng();
    for _ in 0..2000 {
        let region = ByteRegion::new(REGION_LEN).unwrap();
        let bytes: Vec<f64> = (0..REGION_LEN).map(|_| f64::from(rng.gen::<u8>())).collect();
        TypedArray::from_region(ElementKind::Uint8, &region, None, None)
            .unwrap()
            .set(&bytes, None)
            .unwrap();
        let dst_kind = ALL_ELEMENT_KINDS[rng.gen_range(0..ALL_ELEMENT_KINDS.len())];
        let src_kind = ALL_ELEMENT_KINDS[rng.gen_range(0..ALL_ELEMENT_KINDS.len())];
        let dst = random_view(&mut rng, &region, dst_kind);
        let src = random_view(&mut rng, &region, src_kind);
        let src = src.subarray(Some(0), Some(src.len().min(dst.len()) as i64)).unwrap();
        let offset = rng.gen_range(0..=dst.len() - src.len());

        let before = region.to_vec();
        let expected: Vec<f64> = src.iter().map(|v| dst_kind.coerce(v)).collect();
        dst.set(&src, Some(offset as i64)).unwrap();

        let written = dst
            .subarray(Some(offset as i64), Some((offset + src.len()) as i64))
            .unwrap()
            .to_vec();
        assert_eq!(expected.len(), written.len());
        for (e, w) in expected.iter().zip(&written) {
            assert!(
                same_value(*e, *w),
                "{} into {}: expected {:?}, got {:?}",
                src_kind.type_name(),
                dst_kind.type_name(),
                expected,
                written
            );
        }
        let lo = dst.byte_offset() + offset * dst_kind.size();
        let hi = lo + src.len() * dst_kind.size();
        let after = region.to_vec();
        assert_eq!(before[..lo], after[..lo]);
        assert_eq!(before[hi..], after[hi..]);
    }
}

#[test]
fn test_views_share_writes() {
    let region = ByteRegion::new(REGION_LEN).unwrap();
    let views: Vec<TypedArray> = ALL_ELEMENT_KINDS
        .iter()
        .map(|k| TypedArray::from_region(*k, &region, None, None).unwrap())
        .collect();
    let bytes = &views[1];
    assert_eq!(ElementKind::Uint8, bytes.kind());
    for v in &views {
        v.put(0, 1.0).unwrap();
        let expected = v.get(0).unwrap();
        let other = TypedArray::from_region(v.kind(), &region, None, None).unwrap();
        assert_eq!(Some(expected), other.get(0));
        assert_eq!(REGION_LEN, v.byte_length());
    }
}

#[test]
fn test_concurrent_disjoint_writes() {
    let arr = TypedArray::with_length(ElementKind::Int32, 1024).unwrap();
    thread::scope(|s| {
        for t in 0..4i64 {
            let part = arr.subarray(Some(t * 256), Some((t + 1) * 256)).unwrap();
            s.spawn(move || {
                for i in 0..256 {
                    part.put(i, (t * 1000 + i) as f64).unwrap();
                }
            });
        }
    });
    for t in 0..4i64 {
        for i in 0..256 {
            assert_eq!(Some((t * 1000 + i) as f64), arr.get(t * 256 + i));
        }
    }
}

#[test]
fn test_nested_access_to_regions_in_one_slab() {
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let pool = StoragePool::with_default_config();
        let a = ByteRegion::new_in(&pool, 16).unwrap();
        let b = ByteRegion::new_in(&pool, 16).unwrap();
        assert!(a.storage().same_allocation(b.storage()));
        assert!(!a.same_region(&b));

        let src = TypedArray::from_region(ElementKind::Uint8, &a, None, None).unwrap();
        let dst = TypedArray::from_region(ElementKind::Uint8, &b, None, None).unwrap();
        let halves = TypedArray::from_region(ElementKind::Uint16, &b, None, None).unwrap();
        let view = DataView::new(&b, None, None).unwrap();
        let values: Vec<f64> = (1..=16).map(f64::from).collect();
        src.set(&values, None).unwrap();
        // write into one region while iterating over the other.
        for (i, v) in src.iter().enumerate() {
            dst.put(i as i64, v * 2.0).unwrap();
            view.set_uint8(15 - i, view.get_uint8(15 - i).unwrap()).unwrap();
        }
        assert_eq!(values.iter().map(|v| v * 2.0).collect::<Vec<_>>(), dst.to_vec());

        let copy = ByteRegion::from_external(ByteStorage::from_slice(&a.to_vec()).unwrap());
        assert_eq!(a.to_vec(), copy.to_vec());
        dst.set(&src, None).unwrap();
        assert_eq!(b.to_vec(), a.to_vec());
        halves
            .set(&src.subarray(Some(0), Some(8)).unwrap(), None)
            .unwrap();
        assert_eq!(values[..8].to_vec(), halves.to_vec());
        assert_eq!(1, view.get_uint16(0, Endian::NATIVE).unwrap());
        let _ = tx.send(());
    });
    let res = rx.recv_timeout(Duration::from_secs(10));
    assert_ne!(
        Err(mpsc::RecvTimeoutError::Timeout),
        res,
        "access to regions sharing one slab did not finish"
    );
    handle.join().unwrap();
}
