use elfx86_core::syscall::HostIo;
use mockall::mock;

mock! {
    pub Io {}
    impl HostIo for Io {
        fn read_byte(&mut self) -> std::io::Result<Option<u8>>;
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<()>;
    }
}
