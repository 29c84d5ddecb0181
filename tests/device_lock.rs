use okhid::with_device_lock;

#[test]
fn test_lock_is_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("okhid.lock");

    let nested = with_device_lock(&path, || {
        let inner = with_device_lock(&path, || Ok(()));
        Ok(inner.is_err())
    })
    .unwrap();

    assert!(nested, "second holder must be refused");
    assert!(with_device_lock(&path, || Ok(7)).unwrap() == 7, "lock is released afterwards");
}
